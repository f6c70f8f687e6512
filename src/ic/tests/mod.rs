mod label;
mod memory;

use crate::ic::assembler::Assembler;
use crate::ic::memory::Memory;
use crate::ic::stream::Streams;
use crate::ic::{ICError, ICResult, Machine};
use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

/// Write half of the buffer-backed standard output. Clones share the
/// underlying bytes, so a test keeps one end while the machine writes to
/// the other.
#[derive(Clone, Default)]
pub struct SharedSink(Rc<RefCell<Vec<u8>>>);

impl SharedSink {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Standard streams over in-memory buffers; `input` is what the guest will
/// see on `sysin`.
pub fn io_pair(input: &str) -> (Streams, SharedSink) {
    let sink = SharedSink::default();
    let streams = Streams::with_standard(
        Box::new(Cursor::new(input.as_bytes().to_vec())),
        Box::new(sink.clone()),
    );
    (streams, sink)
}

/// A machine whose standard streams are in-memory buffers.
pub fn buffer_machine(input: &str) -> (Machine, SharedSink) {
    let (streams, sink) = io_pair(input);
    (Machine::with_streams(streams), sink)
}

/// Assembles INTCODE text into the image, the way `load_file` does for a
/// host file.
pub fn load(machine: &mut Machine, text: &str) -> ICResult<()> {
    let handle = machine.streams.open_buffer(text.as_bytes().to_vec());
    machine.streams.select_input(handle);
    let result = Assembler::new().assemble(&mut machine.memory, &mut machine.streams);
    machine.streams.end_read();
    result
}

/// Loads and runs a guest program, returning its exit value and output.
pub fn run_guest(text: &str, input: &str) -> (i16, String) {
    let (mut machine, sink) = buffer_machine(input);
    load(&mut machine, text).expect("guest should assemble");
    let value = machine.run().expect("guest should run to completion");
    (value, sink.contents())
}

/// Stores a length-prefixed string into the image at `address`.
pub fn pack(m: &mut Memory, address: u16, text: &str) {
    m.set_byte(address, 0, text.len() as u8);
    for (i, byte) in text.bytes().enumerate() {
        m.set_byte(address, i as u16 + 1, byte);
    }
}

#[test]
fn test_bootstrap_preamble() {
    let (machine, _) = buffer_machine("");
    // Indirect load of the START cell, call, halt opcode.
    assert_eq!(machine.memory.word(401), 0x0108);
    assert_eq!(machine.memory.word(402), 0x0206);
    assert_eq!(machine.memory.word(403), 0x1607);
    assert_eq!(machine.memory.lomem(), 404);
}

#[test]
fn test_global_vector_is_self_referential() {
    let (machine, _) = buffer_machine("");
    assert_eq!(machine.memory.word(0), 0);
    assert_eq!(machine.memory.word(1), 1);
    assert_eq!(machine.memory.word(400), 400);
}

#[test]
fn test_report_halt_goes_to_sysprint() {
    let (mut machine, sink) = buffer_machine("");
    machine.report_halt(&ICError::DuplicateLabel(5));
    assert_eq!(sink.contents(), "DUPLICATE LABEL #5\n");
}

#[test]
fn test_report_halt_reselects_sysprint() {
    let (mut machine, sink) = buffer_machine("");
    machine.streams.select_output(0);
    machine.report_halt(&ICError::UnknownExec(99));
    assert_eq!(sink.contents(), "UNKNOWN EXEC #99\n");
}

#[test]
fn test_report_halt_omits_a_zero_detail() {
    let (mut machine, sink) = buffer_machine("");
    machine.report_halt(&ICError::UnknownExec(0));
    assert_eq!(sink.contents(), "UNKNOWN EXEC\n");
}
