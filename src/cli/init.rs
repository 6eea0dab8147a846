use std::path::PathBuf;

use crate::error::{ReconError, Result};
use crate::models::SystemType;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>, system: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(sys) = system {
        if SystemType::parse(&sys).is_none() {
            return Err(ReconError::UnknownSystem(sys));
        }
        settings.default_system = sys;
    }

    std::fs::create_dir_all(&settings.data_dir)?;
    std::fs::create_dir_all(PathBuf::from(&settings.data_dir).join("exports"))?;
    save_settings(&settings)?;

    println!("Data dir:       {}", settings.data_dir);
    println!("Default system: {}", settings.default_system);
    Ok(())
}
