use std::path::PathBuf;

/// Directory logs land in when none is configured.
pub const DEFAULT_BASEDIR: &str = "./data";

/// strftime pattern for log file names, rendered once per writer.
pub const DEFAULT_FILENAME_TEMPLATE: &str = "dump_%Y-%m-%d_%H-%M-%S.csv";

/// Where and under what name sweep logs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Destination directory. Created on first write if missing.
    pub basedir: PathBuf,
    /// strftime-style file name pattern, rendered with local time at writer creation.
    pub filename_template: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            basedir: PathBuf::from(DEFAULT_BASEDIR),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
        }
    }
}

impl LogConfig {
    pub fn with_basedir(mut self, basedir: impl Into<PathBuf>) -> Self {
        self.basedir = basedir.into();
        self
    }

    pub fn with_filename_template(mut self, template: impl Into<String>) -> Self {
        self.filename_template = template.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LogConfig::default();
        assert_eq!(cfg.basedir, PathBuf::from("./data"));
        assert_eq!(cfg.filename_template, "dump_%Y-%m-%d_%H-%M-%S.csv");
    }

    #[test]
    fn builders_override() {
        let cfg = LogConfig::default()
            .with_basedir("/var/log/matrix")
            .with_filename_template("run.csv");
        assert_eq!(cfg.basedir, PathBuf::from("/var/log/matrix"));
        assert_eq!(cfg.filename_template, "run.csv");
    }
}
