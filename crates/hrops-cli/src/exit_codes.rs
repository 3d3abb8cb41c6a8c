//! Exit codes for the `hrops-export` binary.
//!
//! Scripts branch on these rather than parsing stderr.

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Ok = 0,

    /// A renderer failed or the format is unsupported; stderr carries the
    /// export error payload.
    ExportFailed = 1,

    /// Bad arguments or unreadable input rows.
    ArgsError = 2,

    /// The settings file is missing, malformed or invalid.
    SettingsError = 3,

    /// The rendered file could not be written.
    IoError = 4,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable name for JSON error output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Ok => "OK",
            ExitCode::ExportFailed => "ERR_EXPORT",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::SettingsError => "ERR_SETTINGS",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_stable() {
        assert_eq!(ExitCode::Ok.as_i32(), 0);
        assert_eq!(ExitCode::ExportFailed.as_i32(), 1);
        assert_eq!(ExitCode::ArgsError.as_i32(), 2);
        assert_eq!(ExitCode::SettingsError.as_i32(), 3);
        assert_eq!(ExitCode::IoError.as_i32(), 4);
    }

    #[test]
    fn test_code_names() {
        assert_eq!(ExitCode::Ok.code_name(), "OK");
        assert_eq!(ExitCode::SettingsError.code_name(), "ERR_SETTINGS");
    }
}
