use std::io::{self, Write};

/// Writes to stdout, swallowing broken-pipe errors so piping into
/// `head` or a closed pager never panics or reports a failure.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_bytes(text.as_bytes())
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_bytes(text.as_bytes())?;
    write_bytes(b"\n")
}

fn write_bytes(bytes: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    ignore_broken_pipe(stdout.write_all(bytes))?;
    ignore_broken_pipe(stdout.flush())
}

fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
