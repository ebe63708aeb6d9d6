use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            if path.exists() {
                ConfigLogic::print(&path)?;
            } else {
                // defaults plus command-line overrides
                let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
                println!("{yaml}");
                warning(format!("{} does not exist yet (run `billsync init`).", path.display()));
            }
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
            success(format!("Configuration file {} edited.", path.display()));
        }
    }

    Ok(())
}
