use std::path::PathBuf;

use tracing::{debug, trace};

fn traverse_up_for_env_file(file_name: &str) -> Option<PathBuf> {
    let relative_workspace_root = PathBuf::from("./../../").join(file_name);

    if PathBuf::from(file_name).exists() {
        trace!("Loading environment variables from: {file_name}");
        Some(PathBuf::from(file_name))
    } else if relative_workspace_root.exists() {
        trace!(
            "Loading environment variables from: {}",
            relative_workspace_root.display()
        );
        Some(relative_workspace_root)
    } else {
        trace!(
            "No environment variables file found with name: {:?} in current directory or workspace root",
            file_name
        );
        None
    }
}

pub fn configure_env() -> Result<(), anyhow::Error> {
    if let Some(path) = traverse_up_for_env_file(".env") {
        dotenv::from_filename(path.clone()).ok();
        debug!("Loaded environment variables from: {}", path.display());
    }
    Ok(())
}
