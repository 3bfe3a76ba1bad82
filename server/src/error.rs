/// A simulation tick that could not complete.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The state store holds no status attribute
    #[error("robot state has no status attribute")]
    MissingStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("pixel size must be positive")]
    ZeroPixelSize,

    #[error("{width}x{height} canvas at pixel size {pixel_size} exceeds map size {map_size}")]
    CanvasTooLarge {
        width: u32,
        height: u32,
        pixel_size: u32,
        map_size: u32,
    },
}
