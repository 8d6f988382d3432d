//! `regseal decrypt`: verify and open a base64 envelope.

use crate::cli::{credential_store, read_input, Cli};
use crate::errors::Result;
use crate::protocol::SecureChannel;

/// Execute the `decrypt` command.
pub fn execute(cli: &Cli, envelope: Option<&str>) -> Result<()> {
    let encoded = read_input(envelope, "envelope")?;

    let store = credential_store(cli)?;
    let channel = SecureChannel::new(&store);

    let plaintext = channel.decrypt(&encoded)?;
    println!("{plaintext}");

    Ok(())
}
