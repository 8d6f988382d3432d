//! `regseal encrypt`: seal a payload into a base64 envelope.

use crate::cli::{credential_store, read_input, strip_line_ending, Cli};
use crate::errors::Result;
use crate::protocol::SecureChannel;

/// Execute the `encrypt` command.
pub fn execute(cli: &Cli, text: Option<&str>) -> Result<()> {
    let mut payload = read_input(text, "payload")?;
    if text.is_none() {
        strip_line_ending(&mut payload);
    }

    let store = credential_store(cli)?;
    let channel = SecureChannel::new(&store);

    // Only the envelope goes to stdout so it can be piped onward.
    println!("{}", channel.encrypt(&payload)?);

    Ok(())
}
