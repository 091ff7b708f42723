//! Protocol codec
//!
//! Encoding of commands into request bytes.
//!
//! ## Wire Format
//!
//! ### Single command
//! ```text
//! <name> [arg ...]\n
//! ```
//! String arguments are wrapped in double quotes and passed through verbatim,
//! booleans are `1`/`0`, optional integers are omitted when absent.
//!
//! ### Command list
//! ```text
//! command_list_begin\n
//! <command 1>\n
//! <command 2>\n
//! command_list_end\n
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::Command;
use crate::error::{MpdError, Result};

/// Encode a command to request bytes (rendered text + one trailing newline)
///
/// Rejects commands the daemon could not read back as the intended request:
/// string arguments containing a newline and command lists nested in a list.
pub fn encode_command(command: &Command) -> Result<Bytes> {
    validate_command(command, false)?;

    let text = command.to_string();
    let mut message = BytesMut::with_capacity(text.len() + 1);
    message.put_slice(text.as_bytes());
    message.put_u8(b'\n');

    Ok(message.freeze())
}

fn validate_command(command: &Command, nested: bool) -> Result<()> {
    if let Command::CommandList(commands) = command {
        if nested {
            return Err(MpdError::RequestMalformed(
                "command lists cannot be nested".to_string(),
            ));
        }
        for sub in commands {
            validate_command(sub, true)?;
        }
        return Ok(());
    }

    for arg in command.string_args() {
        if arg.contains('\n') || arg.contains('\r') {
            return Err(MpdError::RequestMalformed(format!(
                "{}: argument contains a line break",
                command.name()
            )));
        }
    }

    Ok(())
}
