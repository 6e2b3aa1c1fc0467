use std::path::PathBuf;

use tagcheck_validator::LoftyTagStore;

pub fn run(path: PathBuf, dry_run: bool) -> anyhow::Result<()> {
    if !path.is_dir() {
        anyhow::bail!("The music folder is missing or not a folder: {}", path.display());
    }

    println!("Checking music library at: {}", path.display());
    if dry_run {
        println!("Dry run: corrections are reported but not written");
    }

    let summary = tagcheck_validator::run(&path, &LoftyTagStore, dry_run)?;

    println!("\n✓ Checked {} file(s) in {} folder(s)", summary.files_checked, summary.folders_visited);
    println!("  Errors:   {}", summary.errors);
    println!("  Warnings: {}", summary.warnings);
    println!("  Repairs:  {}", summary.repairs);
    if dry_run {
        println!("  Updated:  0 (dry run)");
    } else {
        println!("  Updated:  {}", summary.files_updated);
    }

    Ok(())
}
