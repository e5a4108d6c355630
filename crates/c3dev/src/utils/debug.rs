use std::io;

const BYTES_PER_LINE: usize = 16;

/// Writes a hex dump of `data` to `output`, one line of 16 bytes at a time.
///
/// `initial_offset` is the offset printed for the first byte, so a dump of a
/// sub-range of a blob lines up with offsets in the blob itself. Lines are
/// aligned to multiples of 16; a leading partial line is padded.
pub fn hex_dump_to<W>(mut output: W, data: &[u8], initial_offset: usize) -> io::Result<()>
where
    W: io::Write,
{
    if data.is_empty() {
        return Ok(());
    }
    let last_offset = initial_offset + data.len() - 1;
    let offset_width = std::cmp::max(4, format!("{last_offset:X}").len());

    let column_header = (0..BYTES_PER_LINE)
        .map(|i| format!("{i:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(output, "{:offset_width$}  {column_header}", "")?;

    let mut line_start = initial_offset - initial_offset % BYTES_PER_LINE;
    while line_start <= last_offset {
        let mut hex = String::with_capacity(BYTES_PER_LINE * 3);
        let mut ascii = String::with_capacity(BYTES_PER_LINE);
        for offset in line_start..line_start + BYTES_PER_LINE {
            if offset < initial_offset || offset > last_offset {
                hex.push_str("   ");
                ascii.push(' ');
                continue;
            }
            let byte = data[offset - initial_offset];
            hex.push_str(&format!("{byte:02X} "));
            ascii.push(if byte.is_ascii_graphic() || byte == b' ' {
                char::from(byte)
            } else {
                '.'
            });
        }
        writeln!(output, "{line_start:0offset_width$X}: {hex} {ascii}")?;
        line_start += BYTES_PER_LINE;
    }
    Ok(())
}
