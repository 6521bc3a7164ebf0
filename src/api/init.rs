//! Initialization functions bring up the runtime environment before any
//! entry can be built: they resolve global configuration (from a
//! hand-built entity, a YAML file, or environment variables alone) and
//! initialize the logger from the result.

use crate::core::config::{self, ConfigEntity};
use crate::{utils, Result};

/// Initializes using configuration from system environment and defaults
/// for anything undefined.
#[inline]
pub fn init_default() -> Result<()> {
    init_sentinel(&mut String::new())
}

/// Initializes using a hand-crafted config entity.
#[inline]
pub fn init_with_config(config_entity: ConfigEntity) -> Result<()> {
    config_entity.check()?;
    config::reset_global_config(config_entity);
    config::override_config_from_env_and_init_log()?;
    init_core_compoents()
}

/// Loads general configuration from the given YAML file and initializes.
#[inline]
pub fn init_with_config_file(config_path: &mut String) -> Result<()> {
    init_sentinel(config_path)
}

#[inline]
fn init_sentinel(config_path: &mut String) -> Result<()> {
    if config_path.len() > 0 {
        config::init_config_with_yaml(config_path)?;
    } else {
        config::override_config_from_env_and_init_log()?;
    }
    init_core_compoents()
}

#[inline]
fn init_core_compoents() -> Result<()> {
    if config::use_cache_time() {
        utils::start_time_ticker();
    }
    Ok(())
}
