//! C-ABI shims for host runtimes that link the staticlib / cdylib.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! Every function returns a byte count (`>= 0`) on success or a negative
//! [`Lz4Error::code`] on failure:
//!
//! | Code | Meaning               |
//! |------|-----------------------|
//! | `-1` | `DestinationTooSmall` |
//! | `-2` | `CorruptInput`        |
//! | `-3` | `InvalidParameter`    |
//! | `-4` | I/O failure           |
//!
//! Null pointers and negative sizes are `InvalidParameter`.  `-4` only comes
//! from the writer handle, when the underlying file write fails.

use std::ffi::CStr;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::ptr;
use std::slice;

use libc::{c_char, c_int, size_t};

use crate::binding;
use crate::block::types::LZ4_MAX_INPUT_SIZE;
use crate::block_stream::{codec_error, BlockStreamWriter};
use crate::error::Lz4Error;

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Borrow `len` bytes at `ptr`; a null pointer is only accepted for `len == 0`.
#[inline(always)]
unsafe fn input_slice<'a>(ptr: *const c_char, len: c_int) -> Result<&'a [u8], Lz4Error> {
    if len < 0 {
        return Err(Lz4Error::InvalidParameter);
    }
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(Lz4Error::InvalidParameter);
    }
    Ok(slice::from_raw_parts(ptr as *const u8, len as usize))
}

/// Copy `data` into the caller buffer, returning its length.
#[inline(always)]
unsafe fn copy_out(data: &[u8], dst: *mut c_char, dst_capacity: c_int) -> c_int {
    if dst_capacity < 0 || (dst.is_null() && !data.is_empty()) {
        return Lz4Error::InvalidParameter.code();
    }
    if data.len() > dst_capacity as usize {
        return Lz4Error::DestinationTooSmall.code();
    }
    if !data.is_empty() {
        ptr::copy_nonoverlapping(data.as_ptr(), dst as *mut u8, data.len());
    }
    data.len() as c_int
}

/// Return code for a writer-handle failure that is not a codec error.
pub const LZ4B_IO_ERROR: c_int = -4;

fn io_code(e: &io::Error) -> c_int {
    match codec_error(e) {
        Some(err) => err.code(),
        None => LZ4B_IO_ERROR,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// int lz4b_compress_bound(int srcSize);
//
// Largest frame `lz4b_compress` can produce for `srcSize` input bytes.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub extern "C" fn lz4b_compress_bound(src_size: c_int) -> c_int {
    if src_size < 0 || src_size as usize > LZ4_MAX_INPUT_SIZE {
        return Lz4Error::InvalidParameter.code();
    }
    let n = src_size as usize;
    (n + n / 255 + 16) as c_int
}

// ─────────────────────────────────────────────────────────────────────────────
// int lz4b_compress(const char *src, int srcSize,
//                   char *dst, int dstCapacity, int acceleration);
//
// Writes one LZ4 frame to dst.  acceleration <= 0 selects the default.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn lz4b_compress(
    src: *const c_char,
    src_size: c_int,
    dst: *mut c_char,
    dst_capacity: c_int,
    acceleration: c_int,
) -> c_int {
    let input = match input_slice(src, src_size) {
        Ok(s) => s,
        Err(e) => return e.code(),
    };
    let accel = if acceleration > 0 { Some(acceleration) } else { None };
    match binding::compress(input, accel) {
        Ok(frame) => copy_out(&frame, dst, dst_capacity),
        Err(e) => e.code(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// int lz4b_decompress(const char *src, int srcSize,
//                     char *dst, int dstCapacity);
//
// Decodes every frame in src; dstCapacity is the largest acceptable output.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn lz4b_decompress(
    src: *const c_char,
    src_size: c_int,
    dst: *mut c_char,
    dst_capacity: c_int,
) -> c_int {
    let input = match input_slice(src, src_size) {
        Ok(s) => s,
        Err(e) => return e.code(),
    };
    match binding::decompress(input, dst_capacity as i64) {
        Ok(data) => copy_out(&data, dst, dst_capacity),
        Err(e) => e.code(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// const char *lz4b_error_name(int code);
//
// Static NUL-terminated name for a negative code, "OK_NoError" otherwise.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub extern "C" fn lz4b_error_name(code: c_int) -> *const c_char {
    let name: &'static CStr = match Lz4Error::from_code(code) {
        Some(Lz4Error::DestinationTooSmall) => c"ERROR_destination_tooSmall",
        Some(Lz4Error::CorruptInput) => c"ERROR_corrupt_input",
        Some(Lz4Error::InvalidParameter) => c"ERROR_parameter_invalid",
        None if code == LZ4B_IO_ERROR => c"ERROR_io",
        None if code < 0 => c"ERROR_unknown",
        None => c"OK_NoError",
    };
    name.as_ptr()
}

// ─────────────────────────────────────────────────────────────────────────────
// Block stream writer handle
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque handle returned by [`lz4b_writer_open`].
pub struct Lz4bWriter {
    stream: BlockStreamWriter<Box<dyn Write>>,
}

// lz4b_writer *lz4b_writer_open(const char *path, int append);
//
// A null or empty path discards records but still tracks the last block.
// Returns null if the file cannot be opened.
#[no_mangle]
pub unsafe extern "C" fn lz4b_writer_open(path: *const c_char, append: c_int) -> *mut Lz4bWriter {
    let sink: Box<dyn Write> = if path.is_null() || *path == 0 {
        Box::new(io::sink())
    } else {
        let path = match CStr::from_ptr(path).to_str() {
            Ok(p) => p,
            Err(_) => return ptr::null_mut(),
        };
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .append(append != 0)
            .truncate(append == 0)
            .open(path);
        match file {
            Ok(f) => Box::new(BufWriter::<File>::new(f)),
            Err(_) => return ptr::null_mut(),
        }
    };
    Box::into_raw(Box::new(Lz4bWriter {
        stream: BlockStreamWriter::new(sink),
    }))
}

// int lz4b_writer_write(lz4b_writer *w, const char *data, int size, int flush);
//
// Returns the number of records written so far, or a negative code.
#[no_mangle]
pub unsafe extern "C" fn lz4b_writer_write(
    writer: *mut Lz4bWriter,
    data: *const c_char,
    size: c_int,
    flush: c_int,
) -> c_int {
    let Some(w) = writer.as_mut() else {
        return Lz4Error::InvalidParameter.code();
    };
    let input = match input_slice(data, size) {
        Ok(s) => s,
        Err(e) => return e.code(),
    };
    match w.stream.write(input, flush != 0) {
        Ok(()) => w.stream.blocks_written().min(c_int::MAX as u64) as c_int,
        Err(e) => io_code(&e),
    }
}

// const char *lz4b_writer_last_block(const lz4b_writer *w, size_t *len);
//
// The most recent compressed block, valid until the next write or close.
#[no_mangle]
pub unsafe extern "C" fn lz4b_writer_last_block(
    writer: *const Lz4bWriter,
    len: *mut size_t,
) -> *const c_char {
    let Some(w) = writer.as_ref() else {
        if !len.is_null() {
            *len = 0;
        }
        return ptr::null();
    };
    let block = w.stream.last_block();
    if !len.is_null() {
        *len = block.len();
    }
    block.as_ptr() as *const c_char
}

// int lz4b_writer_close(lz4b_writer *w);
//
// Flushes the buffered remainder and frees the handle.  Null is a no-op.
#[no_mangle]
pub unsafe extern "C" fn lz4b_writer_close(writer: *mut Lz4bWriter) -> c_int {
    if writer.is_null() {
        return 0;
    }
    let w = Box::from_raw(writer);
    match w.stream.finish() {
        Ok(_) => 0,
        Err(e) => io_code(&e),
    }
}
