use core::fmt;

#[doc = r#"
A note number from a channel voice message, split into a [`Key`] and an
[`Octave`] for display.

Note numbers are 7-bit: `0` is `C-1`, `60` is middle C (`C4`), `127` is `G9`.

# Example
```rust
# use mtrk::prelude::*;
let note = Note::from_byte(61).unwrap();

assert_eq!(note.key(), Key::CSharp);
assert_eq!(note.octave(), Octave::new(4));
assert_eq!(note.to_string(), "C#4");
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note(u8);

impl Note {
    /// Create a note from a raw data byte.
    ///
    /// Returns `None` when the leading bit is set; that byte could not have
    /// come from a data position.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte > 0x7F { None } else { Some(Self(byte)) }
    }

    /// Identifies the key of the note
    #[inline]
    pub const fn key(&self) -> Key {
        Key::from_note_byte(self.0)
    }

    /// Identifies the octave of the note
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave::from_note_byte(self.0)
    }

    /// The underlying note number
    pub const fn byte(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key(), self.octave())
    }
}

#[allow(missing_docs)]
#[doc = r#"
One of the twelve keys, without an octave.
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    /// Identify the key from a note byte.
    #[inline]
    pub const fn from_note_byte(byte: u8) -> Self {
        use Key::*;
        match byte % 12 {
            0 => C,
            1 => CSharp,
            2 => D,
            3 => DSharp,
            4 => E,
            5 => F,
            6 => FSharp,
            7 => G,
            8 => GSharp,
            9 => A,
            10 => ASharp,
            11 => B,
            _ => unreachable!(),
        }
    }

    /// True for the five sharp keys.
    #[inline]
    pub const fn is_sharp(&self) -> bool {
        use Key::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Key::*;
        match self {
            C => write!(f, "C"),
            CSharp => write!(f, "C#"),
            D => write!(f, "D"),
            DSharp => write!(f, "D#"),
            E => write!(f, "E"),
            F => write!(f, "F"),
            FSharp => write!(f, "F#"),
            G => write!(f, "G"),
            GSharp => write!(f, "G#"),
            A => write!(f, "A"),
            ASharp => write!(f, "A#"),
            B => write!(f, "B"),
        }
    }
}

#[doc = r#"
The octave for a [`Key`]. Values range from -1 to 9.
"#]
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Octave(i8);

impl Octave {
    /// Identify the octave from a note byte.
    pub const fn from_note_byte(byte: u8) -> Self {
        Self((byte / 12) as i8 - 1)
    }

    /// Should be a value between [-1, 9]. Clamps between these two values.
    pub const fn new(mut octave: i8) -> Self {
        if octave < -1 {
            octave = -1;
        } else if octave > 9 {
            octave = 9;
        }
        Self(octave)
    }

    /// The octave, from `[-1, 9]`
    pub const fn value(&self) -> i8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn note_from_byte() {
    use pretty_assertions::assert_eq;
    let c = Note::from_byte(12).unwrap();
    assert_eq!(c.key(), Key::C);
    assert_eq!(c.octave().value(), 0);

    let a_sharp = Note::from_byte(94).unwrap();
    assert_eq!(a_sharp.key(), Key::ASharp);
    assert_eq!(a_sharp.octave().value(), 6);

    assert_eq!(Note::from_byte(0x80), None);
}

#[test]
fn note_display() {
    use pretty_assertions::assert_eq;
    assert_eq!(Note::from_byte(0).unwrap().to_string(), "C-1");
    assert_eq!(Note::from_byte(60).unwrap().to_string(), "C4");
    assert_eq!(Note::from_byte(61).unwrap().to_string(), "C#4");
    assert_eq!(Note::from_byte(127).unwrap().to_string(), "G9");
}

#[test]
fn octave_clamps() {
    use pretty_assertions::assert_eq;
    assert_eq!(Octave::new(12).value(), 9);
    assert_eq!(Octave::new(-3).value(), -1);
}
