//! Fuzz target for export settings parsing and validation.

#![no_main]

use hrops_config::ExportSettings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for parsed in [ExportSettings::parse_toml(text), ExportSettings::parse_json(text)] {
        if let Ok(settings) = parsed {
            let _ = settings.validate();
        }
    }
});
