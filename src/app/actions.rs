#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Start the preview clip, or stop it if one is playing.
    TogglePreview,
    PreviewVolumeUp,
    PreviewVolumeDown,
    /// Poll the backend now instead of waiting for the next interval.
    Refresh,
    /// Search the current track on Spotify.
    OpenSpotify,
    OpenYoutube,
    ToggleHelp,
    Resize,
}
