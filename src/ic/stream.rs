use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

/// Returned by `rdch` once the current input stream is exhausted.
pub const ENDSTREAMCH: i16 = -1;

/// Tab as the BCPL runtime library knows it: byte 8, not ASCII horizontal
/// tab. `readn` treats it as a blank; ASCII 9 terminates a number.
const TAB: i16 = 8;

enum Stream {
    Input(Box<dyn Read>),
    Output(Box<dyn Write>),
}

/// The table of open streams plus the four distinguished handles.
///
/// A guest handle is a positive small integer (slot index plus one); 0 is
/// reserved for "closed or failed". `sysin`/`sysprint` are the standard
/// streams, `cis`/`cos` the currently selected input and output.
pub struct Streams {
    slots: Vec<Option<Stream>>,
    cis: u16,
    cos: u16,
    sysin: u16,
    sysprint: u16,
}

impl Streams {
    /// Standard streams bound to the host's stdin and stdout.
    pub fn new() -> Self {
        Self::with_standard(Box::new(io::stdin()), Box::new(io::stdout()))
    }

    /// Standard streams over arbitrary endpoints; tests substitute buffers.
    pub fn with_standard(input: Box<dyn Read>, output: Box<dyn Write>) -> Self {
        Self {
            slots: vec![Some(Stream::Input(input)), Some(Stream::Output(output))],
            cis: 1,
            cos: 2,
            sysin: 1,
            sysprint: 2,
        }
    }

    pub fn sysprint(&self) -> u16 {
        self.sysprint
    }

    /// Handle of the currently selected input stream.
    pub fn input(&self) -> u16 {
        self.cis
    }

    /// Handle of the currently selected output stream.
    pub fn output(&self) -> u16 {
        self.cos
    }

    pub fn select_input(&mut self, handle: u16) {
        self.cis = handle;
    }

    pub fn select_output(&mut self, handle: u16) {
        self.cos = handle;
    }

    /// `findinput`: opens a named stream for reading. The reserved names
    /// `SYSIN` and `SYSPRINT` resolve to the current standard handles
    /// instead of the filesystem. Returns 0 when the open fails.
    pub fn find_input(&mut self, name: &str) -> u16 {
        match self.standard_handle(name) {
            Some(handle) => handle,
            None => match File::open(name) {
                Ok(file) => self.push(Stream::Input(Box::new(BufReader::new(file)))),
                Err(_) => 0,
            },
        }
    }

    /// `findoutput`: like `find_input`, but creating/truncating for writing.
    pub fn find_output(&mut self, name: &str) -> u16 {
        match self.standard_handle(name) {
            Some(handle) => handle,
            None => match File::create(name) {
                Ok(file) => self.push(Stream::Output(Box::new(file))),
                Err(_) => 0,
            },
        }
    }

    /// Opens a host path for reading (object files, `-i` redirection).
    pub fn open_input(&mut self, path: &Path) -> io::Result<u16> {
        let file = File::open(path)?;
        Ok(self.push(Stream::Input(Box::new(BufReader::new(file)))))
    }

    /// Opens a host path for writing (`-o` redirection).
    pub fn open_output(&mut self, path: &Path) -> io::Result<u16> {
        let file = File::create(path)?;
        Ok(self.push(Stream::Output(Box::new(file))))
    }

    /// Opens an in-memory input stream.
    #[cfg(test)]
    pub fn open_buffer(&mut self, bytes: Vec<u8>) -> u16 {
        self.push(Stream::Input(Box::new(io::Cursor::new(bytes))))
    }

    /// Makes `handle` both the standard and the current input.
    pub fn pipe_input(&mut self, handle: u16) {
        self.sysin = handle;
        self.cis = handle;
    }

    /// Makes `handle` both the standard and the current output.
    pub fn pipe_output(&mut self, handle: u16) {
        self.sysprint = handle;
        self.cos = handle;
    }

    /// `endread`: closes the current input and reverts to the standard one.
    /// Closing while the standard input is selected kills it for good; a
    /// guest doing that reads ENDSTREAMCH from then on.
    pub fn end_read(&mut self) {
        self.close(self.cis);
        self.cis = self.sysin;
    }

    /// `endwrite`: closes the current output and reverts to the standard one.
    pub fn end_write(&mut self) {
        self.close(self.cos);
        self.cos = self.sysprint;
    }

    /// `rdch`: one byte from the current input. Carriage return is folded to
    /// line feed; end of stream or a dead handle yields ENDSTREAMCH.
    pub fn rdch(&mut self) -> i16 {
        let Some(Some(Stream::Input(source))) = self.slot_mut(self.cis) else {
            return ENDSTREAMCH;
        };
        let mut byte = [0u8; 1];
        match source.read(&mut byte) {
            Ok(1) => match byte[0] {
                b'\r' => i16::from(b'\n'),
                ch => i16::from(ch),
            },
            _ => ENDSTREAMCH,
        }
    }

    /// `wrch`: one byte to the current output. Line feed becomes the host
    /// newline; writes to a dead handle are dropped.
    pub fn wrch(&mut self, ch: u8) {
        match ch {
            b'\n' => self.newline(),
            ch => self.write_byte(ch),
        }
    }

    /// Emits the host newline convention.
    pub fn newline(&mut self) {
        self.write_byte(b'\n');
    }

    /// `readn`: skips blanks (space, line feed and tab), honors an optional
    /// sign and accumulates decimal digits with 16-bit wrap-around. Returns
    /// the value together with the character that terminated it.
    pub fn readn(&mut self) -> (i16, i16) {
        let mut ch = self.rdch();
        while ch == i16::from(b' ') || ch == i16::from(b'\n') || ch == TAB {
            ch = self.rdch();
        }
        let negative = ch == i16::from(b'-');
        if negative || ch == i16::from(b'+') {
            ch = self.rdch();
        }
        let mut sum: i16 = 0;
        while (i16::from(b'0')..=i16::from(b'9')).contains(&ch) {
            sum = sum.wrapping_mul(10).wrapping_add(ch - i16::from(b'0'));
            ch = self.rdch();
        }
        match negative {
            true => (sum.wrapping_neg(), ch),
            false => (sum, ch),
        }
    }

    /// Flushes every open output stream.
    pub fn flush(&mut self) {
        for slot in &mut self.slots {
            if let Some(Stream::Output(sink)) = slot {
                let _ = sink.flush();
            }
        }
    }

    fn push(&mut self, stream: Stream) -> u16 {
        self.slots.push(Some(stream));
        self.slots.len() as u16
    }

    fn close(&mut self, handle: u16) {
        if let Some(slot) = self.slots.get_mut(usize::from(handle.wrapping_sub(1))) {
            *slot = None;
        }
    }

    fn slot_mut(&mut self, handle: u16) -> Option<&mut Option<Stream>> {
        self.slots.get_mut(usize::from(handle.wrapping_sub(1)))
    }

    fn standard_handle(&self, name: &str) -> Option<u16> {
        if name.eq_ignore_ascii_case("SYSIN") {
            Some(self.sysin)
        } else if name.eq_ignore_ascii_case("SYSPRINT") {
            Some(self.sysprint)
        } else {
            None
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let Some(Some(Stream::Output(sink))) = self.slot_mut(self.cos) else {
            return;
        };
        let _ = sink.write_all(&[byte]);
    }
}
