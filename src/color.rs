//! Dominant color of album art, used to tint the UI.

use anyhow::Context;
use std::fmt;

/// Side of the thumbnail sampled for the average.
const SAMPLE_SIZE: u32 = 32;
/// Pixels at or below this alpha are ignored.
const ALPHA_THRESHOLD: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness in `[0, 1]`.
    pub fn luma(self) -> f32 {
        (self.r as f32 * 0.299 + self.g as f32 * 0.587 + self.b as f32 * 0.114) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Download album art and compute its dominant color.
pub async fn fetch_dominant(client: &reqwest::Client, url: &str) -> anyhow::Result<Rgb> {
    let response = client.get(url).send().await.context("fetch album art")?;
    if !response.status().is_success() {
        anyhow::bail!("album art error: {}", response.status());
    }
    let bytes = response.bytes().await.context("read album art")?;

    // Decoding is CPU bound; keep it off the async workers.
    tokio::task::spawn_blocking(move || dominant_from_bytes(&bytes))
        .await
        .context("join color task")?
}

/// Decode an encoded image and average it.
pub fn dominant_from_bytes(bytes: &[u8]) -> anyhow::Result<Rgb> {
    let img = image::load_from_memory(bytes).context("decode album art")?;
    let img = img.to_rgba8();
    let img = image::imageops::resize(
        &img,
        SAMPLE_SIZE,
        SAMPLE_SIZE,
        image::imageops::FilterType::Nearest,
    );
    Ok(dominant(img.pixels().map(|p| p.0)))
}

/// Square-root mean of opaque RGBA pixels. Fully transparent input yields
/// black.
pub fn dominant(pixels: impl IntoIterator<Item = [u8; 4]>) -> Rgb {
    let mut sum = [0f64; 3];
    let mut count = 0u64;

    for [r, g, b, a] in pixels {
        if a <= ALPHA_THRESHOLD {
            continue;
        }
        for (acc, c) in sum.iter_mut().zip([r, g, b]) {
            *acc += f64::from(c) * f64::from(c);
        }
        count += 1;
    }

    if count == 0 {
        return Rgb::BLACK;
    }

    let channel = |s: f64| (s / count as f64).sqrt().round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(sum[0]), channel(sum[1]), channel(sum[2]))
}
