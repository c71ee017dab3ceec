#[allow(unused_imports)]
pub use anyhow::{Context, Error, Result, anyhow, bail, ensure};
#[allow(unused_imports)]
pub use log::{debug, error, info, trace, warn};
