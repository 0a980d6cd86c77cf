mod load;
mod types;

pub use load::{
    apply_env_overrides, load_default, load_from, ENV_PDP_URL, ENV_PERMIT_KEY, LOCAL_CONFIG_FILE,
};
pub use types::*;
