pub use anyhow::{bail, ensure, Result};
