//! mbox splitting.
//!
//! A message starts at a line beginning with `From ` (the envelope line, which
//! is not part of the message). Quoted body lines (`>From `, `>>From `, ...)
//! lose one `>`, so both mboxo and mboxrd files read back correctly.

/// Split mbox bytes into raw messages, in file order.
///
/// Input without any envelope line is treated as a single message, which
/// lets a lone `.eml` file be archived as well.
pub fn split_mbox(data: &[u8]) -> Vec<Vec<u8>> {
    let mut messages = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    for line in data.split_inclusive(|&b| b == b'\n') {
        if line.starts_with(b"From ") {
            push_message(&mut messages, std::mem::take(&mut current));
            continue;
        }
        current.extend_from_slice(unquote_from_line(line));
    }
    push_message(&mut messages, current);

    messages
}

fn push_message(messages: &mut Vec<Vec<u8>>, mut message: Vec<u8>) {
    if message.iter().all(u8::is_ascii_whitespace) {
        return;
    }
    // Separator blank line written before the next envelope
    if message.ends_with(b"\r\n\r\n") {
        message.truncate(message.len() - 2);
    } else if message.ends_with(b"\n\n") {
        message.truncate(message.len() - 1);
    }
    messages.push(message);
}

fn unquote_from_line(line: &[u8]) -> &[u8] {
    let quotes = line.iter().take_while(|&&b| b == b'>').count();
    if quotes > 0 && line[quotes..].starts_with(b"From ") {
        &line[1..]
    } else {
        line
    }
}
