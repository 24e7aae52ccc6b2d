use std::path::Path;

use tide_stack::TideConfig;

pub fn init(config: &str, force: bool) -> anyhow::Result<()> {
    let path = Path::new(config);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let scaffold = TideConfig::scaffold()?;
    std::fs::write(path, scaffold.to_toml_string()?)?;
    println!("✓ Generated {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_parseable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tide.toml");
        let path_str = path.to_str().unwrap();

        init(path_str, false).unwrap();
        let cfg = TideConfig::from_file(&path).unwrap();
        assert_eq!(cfg.stacks.len(), 2);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tide.toml");
        std::fs::write(&path, "# mine\n").unwrap();
        let path_str = path.to_str().unwrap();

        assert!(init(path_str, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        init(path_str, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("FargateService-dev"));
    }
}
