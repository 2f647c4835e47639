//! This is a collection of useful utilities.

use std::fs::File;
use std::io::{Error, Write};

pub fn save_to_file(filename: &str, content: &str) -> Result<(), Error> {
    let mut f = File::create(filename)?;
    write!(&mut f, "{}", content)?;
    #[cfg(feature = "log")]
    log::info!("Wrote {}", filename);
    Result::Ok(())
}
