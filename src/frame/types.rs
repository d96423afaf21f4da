//! Vocabulary of the LZ4 frame layer.
//!
//! Holds:
//! - Frame format constants (magic numbers, block-size flag bit, header sizes)
//! - Descriptor enums: `BlockSizeId`, `BlockMode`, `ContentChecksum`,
//!   `BlockChecksum`, `FrameType`
//! - `FrameInfo` / `Preferences`
//! - `Lz4FError` with C-style `error_name()` strings and the mapping onto the
//!   three codec-level [`Lz4Error`] kinds

use core::fmt;

use crate::block::LZ4_ACCELERATION_DEFAULT;
use crate::error::Lz4Error;

// ─────────────────────────────────────────────────────────────────────────────
// Frame format constants
// ─────────────────────────────────────────────────────────────────────────────

/// Magic number opening every standard LZ4 frame.
pub const LZ4F_MAGICNUMBER: u32 = 0x184D_2204;

/// First of the sixteen skippable-frame magic numbers (`0x184D2A50..=0x184D2A5F`).
pub const LZ4F_MAGIC_SKIPPABLE_START: u32 = 0x184D_2A50;

/// Mask selecting the fixed part of a skippable-frame magic number.
pub const LZ4F_SKIPPABLE_MASK: u32 = 0xFFFF_FFF0;

/// High bit of a block header: the block data is stored uncompressed.
pub const LZ4F_BLOCKUNCOMPRESSED_FLAG: u32 = 0x8000_0000;

/// Block header size in bytes (block data length + stored flag bit).
pub const BH_SIZE: usize = 4;

/// Per-block XXH32 trailer, written only with `BlockChecksum::Enabled`.
pub const BF_SIZE: usize = 4;

/// Smallest LZ4 frame header: magic + FLG + BD + HC.
pub const MIN_FH_SIZE: usize = 7;

/// Largest LZ4 frame header: adds the 8-byte content size and 4-byte dict ID.
pub const MAX_FH_SIZE: usize = 19;

/// Skippable frame header: magic + 4-byte user-data length.
pub const SKIPPABLE_HEADER_SIZE: usize = 8;

/// Bytes of header needed before the full header length is known (magic + FLG).
pub const MIN_HEADER_PROBE: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Descriptor enums
// ─────────────────────────────────────────────────────────────────────────────

/// BD field value selecting the largest block a frame may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlockSizeId {
    /// Written as `Max64Kb`.
    #[default]
    Default = 0,
    Max64Kb = 4,
    Max256Kb = 5,
    Max1Mb = 6,
    Max4Mb = 7,
}

impl BlockSizeId {
    /// Parse the 3-bit id stored in the BD byte.  Ids below 4 are reserved.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            4 => Some(BlockSizeId::Max64Kb),
            5 => Some(BlockSizeId::Max256Kb),
            6 => Some(BlockSizeId::Max1Mb),
            7 => Some(BlockSizeId::Max4Mb),
            _ => None,
        }
    }

    /// The id as written to the BD byte (`Default` encodes as 64 KiB).
    pub fn id(self) -> u8 {
        match self {
            BlockSizeId::Default | BlockSizeId::Max64Kb => 4,
            BlockSizeId::Max256Kb => 5,
            BlockSizeId::Max1Mb => 6,
            BlockSizeId::Max4Mb => 7,
        }
    }
}

/// Whether blocks may reach back into earlier blocks of the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlockMode {
    /// Blocks may reference the previous 64 KiB of decoded data.
    #[default]
    Linked = 0,
    /// Each block decodes on its own.
    Independent = 1,
}

/// XXH32 of the whole decoded content, written after the end mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ContentChecksum {
    #[default]
    Disabled = 0,
    Enabled = 1,
}

/// Whether a 32-bit checksum follows each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlockChecksum {
    #[default]
    Disabled = 0,
    Enabled = 1,
}

/// Standard frame or one of the sixteen skippable variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum FrameType {
    #[default]
    Frame = 0,
    SkippableFrame = 1,
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameInfo and Preferences
// ─────────────────────────────────────────────────────────────────────────────

/// Frame descriptor, written once by the compressor and read back by the
/// decoder.  Fixed for the lifetime of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInfo {
    /// Largest block in the frame; sizes the decoder's buffers.
    pub block_size_id: BlockSizeId,
    pub block_mode: BlockMode,
    pub content_checksum_flag: ContentChecksum,
    /// Filled in by the decoder; ignored by the encoder.
    pub frame_type: FrameType,
    /// Uncompressed content size, when declared.  For a skippable frame this
    /// is the length of its user data.
    pub content_size: Option<u64>,
    /// Dictionary ID hint.  Parsed and reported; no dictionary is applied.
    pub dict_id: Option<u32>,
    pub block_checksum_flag: BlockChecksum,
}

/// Compression settings: the frame descriptor plus the encoder acceleration.
///
/// Setting `frame_info.content_size` to `Some(_)` asks the one-shot
/// compressor to declare the content size; the value itself is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub frame_info: FrameInfo,
    /// Encoder acceleration (1 = full search, larger = faster and weaker).
    pub acceleration: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            frame_info: FrameInfo::default(),
            acceleration: LZ4_ACCELERATION_DEFAULT,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error codes
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the frame layer can fail with.
///
/// Names follow the `ERROR_*` strings used across LZ4 tooling so log lines are
/// greppable.  Every variant maps onto one codec-level [`Lz4Error`] through
/// [`Lz4FError::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lz4FError {
    /// Reserved block size id in the BD byte.
    MaxBlockSizeInvalid,
    /// Out-of-range argument.
    ParameterInvalid,
    /// FLG version bits are not `01`.
    HeaderVersionWrong,
    /// Block checksum mismatch.
    BlockChecksumInvalid,
    /// A reserved FLG/BD bit is set.
    ReservedFlagSet,
    /// Input larger than the encoder accepts (or a block larger than the frame block size).
    SrcSizeTooLarge,
    /// Output would exceed the caller's limit.
    DstMaxSizeTooSmall,
    /// Input ends inside the frame header.
    FrameHeaderIncomplete,
    /// Magic number is neither a standard nor a skippable frame.
    FrameTypeUnknown,
    /// Input ends inside a block, or the declared content size does not match.
    FrameSizeWrong,
    /// Block decoder rejected the token stream.
    DecompressionFailed,
    /// Header checksum byte mismatch.
    HeaderChecksumInvalid,
    /// Content checksum mismatch.
    ContentChecksumInvalid,
    /// `compress_block`/`end` called before `begin`.
    CompressionStateUninitialized,
    /// Underlying writer failed.
    IoWrite,
    /// Underlying reader failed or ended early.
    IoRead,
}

impl Lz4FError {
    /// Human-readable name string in the `ERROR_*` style.
    pub fn error_name(&self) -> &'static str {
        match self {
            Lz4FError::MaxBlockSizeInvalid => "ERROR_maxBlockSize_invalid",
            Lz4FError::ParameterInvalid => "ERROR_parameter_invalid",
            Lz4FError::HeaderVersionWrong => "ERROR_headerVersion_wrong",
            Lz4FError::BlockChecksumInvalid => "ERROR_blockChecksum_invalid",
            Lz4FError::ReservedFlagSet => "ERROR_reservedFlag_set",
            Lz4FError::SrcSizeTooLarge => "ERROR_srcSize_tooLarge",
            Lz4FError::DstMaxSizeTooSmall => "ERROR_dstMaxSize_tooSmall",
            Lz4FError::FrameHeaderIncomplete => "ERROR_frameHeader_incomplete",
            Lz4FError::FrameTypeUnknown => "ERROR_frameType_unknown",
            Lz4FError::FrameSizeWrong => "ERROR_frameSize_wrong",
            Lz4FError::DecompressionFailed => "ERROR_decompressionFailed",
            Lz4FError::HeaderChecksumInvalid => "ERROR_headerChecksum_invalid",
            Lz4FError::ContentChecksumInvalid => "ERROR_contentChecksum_invalid",
            Lz4FError::CompressionStateUninitialized => "ERROR_compressionState_uninitialized",
            Lz4FError::IoWrite => "ERROR_io_write",
            Lz4FError::IoRead => "ERROR_io_read",
        }
    }

    /// Collapse onto the three codec-level error kinds.
    ///
    /// | Kind                  | Variants                                                   |
    /// |-----------------------|------------------------------------------------------------|
    /// | `DestinationTooSmall` | `DstMaxSizeTooSmall`, `IoWrite`                            |
    /// | `InvalidParameter`    | parameter, version, reserved-bit and block-size-id errors  |
    /// | `CorruptInput`        | everything the input itself got wrong                      |
    ///
    /// `IoWrite` and `IoRead` only come from the streaming adapters in
    /// [`crate::file`], which hand back the `Lz4FError` itself; the collapse
    /// matters only to callers that reduce it to three kinds on purpose.
    pub fn kind(&self) -> Lz4Error {
        match self {
            Lz4FError::DstMaxSizeTooSmall | Lz4FError::IoWrite => Lz4Error::DestinationTooSmall,
            Lz4FError::MaxBlockSizeInvalid
            | Lz4FError::ParameterInvalid
            | Lz4FError::HeaderVersionWrong
            | Lz4FError::ReservedFlagSet
            | Lz4FError::SrcSizeTooLarge
            | Lz4FError::CompressionStateUninitialized => Lz4Error::InvalidParameter,
            Lz4FError::BlockChecksumInvalid
            | Lz4FError::FrameHeaderIncomplete
            | Lz4FError::FrameTypeUnknown
            | Lz4FError::FrameSizeWrong
            | Lz4FError::DecompressionFailed
            | Lz4FError::HeaderChecksumInvalid
            | Lz4FError::ContentChecksumInvalid
            | Lz4FError::IoRead => Lz4Error::CorruptInput,
        }
    }
}

impl From<Lz4Error> for Lz4FError {
    fn from(e: Lz4Error) -> Self {
        match e {
            Lz4Error::DestinationTooSmall => Lz4FError::DstMaxSizeTooSmall,
            Lz4Error::CorruptInput => Lz4FError::DecompressionFailed,
            Lz4Error::InvalidParameter => Lz4FError::ParameterInvalid,
        }
    }
}

impl fmt::Display for Lz4FError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_name())
    }
}

impl std::error::Error for Lz4FError {}
