use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The full set of status bytes a sequence can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum StatusCode {
    /// Channel voice: note released
    NoteOff = 0x80,
    /// Channel voice: note pressed
    NoteOn = 0x90,
    /// Channel voice: per-key pressure
    PolyphonicAftertouch = 0xA0,
    /// Channel voice: controller change
    ControlChange = 0xB0,
    /// Channel voice: instrument change
    ProgramChange = 0xC0,
    /// Channel voice: channel-wide pressure
    ChannelPressureAftertouch = 0xD0,
    /// Channel voice: pitch wheel
    PitchBendChange = 0xE0,

    /// Start of a system exclusive message
    SysEx = 0xF0,
    /// MIDI time code quarter frame
    MidiTimeCodeQuarterFrame = 0xF1,
    /// Song position pointer
    SongPositionPointer = 0xF2,
    /// Song select
    SongSelect = 0xF3,
    /// Tune request
    TuneRequest = 0xF6,
    /// End of a system exclusive message, or an escaped continuation in a file
    SysExEnd = 0xF7,
    /// Real-time timing clock
    TimingClock = 0xF8,
    /// Real-time start
    Start = 0xFA,
    /// Real-time continue
    Continue = 0xFB,
    /// Real-time stop
    Stop = 0xFC,
    /// Real-time active sensing
    ActiveSensing = 0xFE,
    /// Meta event (file only)
    MetaData = 0xFF,
}

#[doc = r#"
The type byte following `FF` in a meta event.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MetaKind {
    /// Sequence or pattern number
    SequenceNumber = 0x00,
    /// Free text
    Text = 0x01,
    /// Copyright notice
    Copyright = 0x02,
    /// Sequence or track name
    TrackName = 0x03,
    /// Instrument name. Also used as a device name by some sequencers.
    InstrumentName = 0x04,
    /// Lyric syllable
    Lyrics = 0x05,
    /// Rehearsal marker
    Marker = 0x06,
    /// Cue point
    CueMarker = 0x07,
    /// Device (port) name
    DeviceName = 0x09,
    /// Channel prefix for following meta and sysex events
    ChannelPrefix = 0x20,
    /// Output port for the track
    MidiPort = 0x21,
    /// End of track
    EndOfTrack = 0x2F,
    /// Microseconds per quarter note, 24 bit
    SetTempo = 0x51,
    /// SMPTE start offset of the track
    SmpteOffset = 0x54,
    /// Time signature
    TimeSignature = 0x58,
    /// Key signature
    KeySignature = 0x59,
    /// Sequencer specific payload
    SequencerSpecific = 0x7F,
}

/// Controller numbers the container interprets.
pub mod controller {
    /// Bank select, most significant byte
    pub const BANK_SELECT: u8 = 0x00;
    /// Bank select, least significant byte
    pub const BANK_SELECT_LSB: u8 = 0x20;
    /// Touhou loop start (value must be 0)
    pub const TOUHOU_LOOP_START: u8 = 2;
    /// Touhou loop end (value must be 0)
    pub const TOUHOU_LOOP_END: u8 = 4;
    /// EMIDI track designation; doubles as the XMI loop start
    pub const EMIDI_TRACK_DESIGNATION: u8 = 110;
    /// XMI loop end, RPG Maker loop point
    pub const LOOP_POINT: u8 = 111;
    /// AIL "for loop" controller
    pub const AIL_FOR_LOOP: u8 = 116;
    /// AIL "next / break" controller
    pub const AIL_NEXT_BREAK: u8 = 117;
    /// First controller reserved to EMIDI and AIL
    pub const EMIDI_FIRST: u8 = 110;
    /// Last controller reserved to EMIDI and AIL
    pub const EMIDI_LAST: u8 = 119;
}
