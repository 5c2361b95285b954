//! Server configuration
//!
//! Configuration is loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,

    /// Upload configuration
    pub upload: UploadConfig,

    /// Segmentation configuration
    pub segmentation: SegmentationConfig,

    /// Final image rendering configuration
    pub render: RenderConfig,

    /// Static file serving configuration
    pub static_files: StaticFilesConfig,
}

/// Upload-related configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory where uploaded files are written
    pub dir: PathBuf,
    /// Maximum upload size in bytes
    pub max_size: usize,
}

/// Segmentation-related configuration
#[derive(Debug, Clone)]
pub struct SegmentationConfig {
    /// Simulated latency of the stub segmenter
    pub stub_delay: Duration,
}

/// Final image configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

/// Static UI bundle configuration
#[derive(Debug, Clone, Default)]
pub struct StaticFilesConfig {
    /// Directory containing index.html and assets; serving is disabled when unset
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            upload: UploadConfig::default(),
            segmentation: SegmentationConfig::default(),
            render: RenderConfig::default(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            stub_delay: Duration::from_secs(2),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { jpeg_quality: 90 }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Server config
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }

        // Upload config
        if let Ok(dir) = env::var("UPLOAD_DIR")
            && !dir.is_empty()
        {
            config.upload.dir = PathBuf::from(dir);
        }
        if let Ok(val) = env::var("MAX_UPLOAD_SIZE_MB")
            && let Some(bytes) = parse_megabytes(&val)
        {
            config.upload.max_size = bytes;
        }

        // Segmentation config
        if let Ok(val) = env::var("SEGMENTATION_DELAY_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.segmentation.stub_delay = Duration::from_millis(ms);
        }

        // Render config
        if let Ok(val) = env::var("FINAL_IMAGE_QUALITY")
            && let Ok(q) = val.parse::<u8>()
            && (1..=100).contains(&q)
        {
            config.render.jpeg_quality = q;
        }

        // Static files
        if let Ok(dir) = env::var("STATIC_FILES_DIR")
            && !dir.is_empty()
        {
            config.static_files.dir = Some(PathBuf::from(dir));
        }

        config
    }
}

/// Parse a size in megabytes into bytes; None when invalid or too large
fn parse_megabytes(value: &str) -> Option<usize> {
    value.parse::<usize>().ok()?.checked_mul(1024 * 1024)
}
