/// Size of the word-addressable memory image. Code, static data, the global
/// vector and the execution stack all share this one array.
pub const WORD_COUNT: usize = 19900;

/// First word after the global vector. Assembled code is appended from here,
/// and execution starts here too: the bootstrap preamble occupies the first
/// three words of the code region.
pub const PROG_START: u16 = 401;

/// Number of label slots available to a single translation unit.
pub const LABEL_COUNT: usize = 500;

/// Bytes per memory word. Packed strings and the `C` directive address the
/// image at this granularity.
pub const BYTES_PER_WORD: u16 = 2;

/// Global-vector cell holding the guest entry point; the guest's `G 1 L n`
/// directive overwrites its self-referential initial value with the address
/// of `START`.
pub const START_CELL: u16 = 1;

/// Global-vector cell where `readn` leaves the character that terminated
/// the number.
pub const TERMINATOR_CELL: u16 = 71;

/// ASCII form feed, emitted by the NEWPAGE call.
pub const FORM_FEED: u8 = 12;

// System-call numbers of the BCPL runtime library (bcpltape/sys3/bcpl/libhdr).
// Numbers below PROG_START reaching a K instruction are dispatched here
// instead of being called as guest code.
pub const CALL_SELECT_INPUT: i16 = 11;
pub const CALL_SELECT_OUTPUT: i16 = 12;
pub const CALL_RDCH: i16 = 13;
pub const CALL_WRCH: i16 = 14;
pub const CALL_INPUT: i16 = 16;
pub const CALL_OUTPUT: i16 = 17;
pub const CALL_STOP: i16 = 30;
pub const CALL_LEVEL: i16 = 31;
pub const CALL_LONGJUMP: i16 = 32;
pub const CALL_APTOVEC: i16 = 40;
pub const CALL_FINDOUTPUT: i16 = 41;
pub const CALL_FINDINPUT: i16 = 42;
pub const CALL_ENDREAD: i16 = 46;
pub const CALL_ENDWRITE: i16 = 47;
pub const CALL_WRITES: i16 = 60;
pub const CALL_WRITEN: i16 = 62;
pub const CALL_NEWLINE: i16 = 63;
pub const CALL_NEWPAGE: i16 = 64;
pub const CALL_PACKSTRING: i16 = 66;
pub const CALL_UNPACKSTRING: i16 = 67;
pub const CALL_WRITED: i16 = 68;
pub const CALL_READN: i16 = 70;
pub const CALL_WRITEHEX: i16 = 75;
pub const CALL_WRITEF: i16 = 76;
pub const CALL_WRITEOCT: i16 = 77;
pub const CALL_GETBYTE: i16 = 85;
pub const CALL_PUTBYTE: i16 = 86;
