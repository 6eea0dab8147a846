use std::path::{Path, PathBuf};

use crate::cli::resolve_system;
use crate::error::Result;
use crate::refdata;
use crate::settings::get_data_dir;
use crate::template::{default_filename, write_template, TemplateEntry};

pub fn run(output: Option<&str>, from: Option<&str>, system: Option<&str>) -> Result<()> {
    let system = resolve_system(system)?;

    let entries = match from {
        Some(path) => {
            let existing = refdata::load_existing(Path::new(path))?;
            TemplateEntry::from_existing(&existing, system)
        }
        None => Vec::new(),
    };

    let path = match output {
        Some(p) => PathBuf::from(p),
        None => get_data_dir().join("exports").join(default_filename(system)),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    write_template(&path, &entries, system)?;
    println!("Wrote {} ({} rows)", path.display(), entries.len());
    Ok(())
}
