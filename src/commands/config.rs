use crate::core::{
    config::Config,
    error::Result,
    output::{print_field, print_section_header, print_success},
};

/// Show the configuration, updating it first when values are given.
///
/// A walk limit of 0 removes the limit.
pub fn execute_config(compression_level: Option<u32>, walk_limit: Option<usize>) -> Result<()> {
    let mut config = Config::load()?;

    if compression_level.is_some() || walk_limit.is_some() {
        if let Some(level) = compression_level {
            config.compression_level = level;
        }
        if let Some(limit) = walk_limit {
            config.walk_limit = (limit > 0).then_some(limit);
        }
        config.save()?;
        print_success("Configuration saved");
    }

    print_section_header("Configuration");
    print_field("Compression", &config.compression_level.to_string());
    print_field(
        "Walk limit",
        &config
            .walk_limit
            .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string()),
    );
    println!();
    Ok(())
}
