//! Line commands read from stdin.

use color_eyre::eyre::{bail, eyre, Result, WrapErr};

use pocket_synth::DrumPreset;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    Drum(DrumPreset),
    NoteOn { channel: u8, note: u8 },
    NoteOff { channel: u8, note: u8 },
    Bpm(u32),
    Volume(f32),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  play               start the drum pattern
  pause              hold the pattern where it is
  stop               stop the pattern and silence every voice
  drum <name>        kick snare hihat crash ride tom_high tom_mid tom_low
  note <ch> <n>      start MIDI note n on channel ch
  off <ch> <n>       release it
  bpm <60-240>       tempo
  volume <0-1>       pattern and master volume
  status             voices, drum hits and tempo
  quit";

impl Command {
    /// Parse one line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "play" => Command::Play,
            "pause" => Command::Pause,
            "stop" => Command::Stop,
            "drum" => {
                let name = words.next().ok_or_else(|| eyre!("usage: drum <name>"))?;
                Command::Drum(name.parse()?)
            }
            "note" => {
                let (channel, note) = channel_and_note(&mut words).wrap_err("usage: note <ch> <n>")?;
                Command::NoteOn { channel, note }
            }
            "off" => {
                let (channel, note) = channel_and_note(&mut words).wrap_err("usage: off <ch> <n>")?;
                Command::NoteOff { channel, note }
            }
            "bpm" => Command::Bpm(arg(&mut words, "bpm")?),
            "volume" | "vol" => Command::Volume(arg(&mut words, "volume")?),
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("unknown command `{other}` (try `help`)"),
        };
        Ok(Some(command))
    }
}

fn arg<'a, T>(words: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let word = words.next().ok_or_else(|| eyre!("missing {what}"))?;
    word.parse()
        .wrap_err_with(|| format!("invalid {what} `{word}`"))
}

fn channel_and_note<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<(u8, u8)> {
    let channel = arg(&mut *words, "channel")?;
    let note = arg(&mut *words, "note")?;
    Ok((channel, note))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("play").unwrap(), Some(Command::Play));
        assert_eq!(Command::parse("  STOP ").unwrap(), Some(Command::Stop));
        assert_eq!(
            Command::parse("drum tom_low").unwrap(),
            Some(Command::Drum(DrumPreset::TomLow))
        );
        assert_eq!(
            Command::parse("note 2 64").unwrap(),
            Some(Command::NoteOn { channel: 2, note: 64 })
        );
        assert_eq!(
            Command::parse("off 2 64").unwrap(),
            Some(Command::NoteOff { channel: 2, note: 64 })
        );
        assert_eq!(Command::parse("bpm 140").unwrap(), Some(Command::Bpm(140)));
        assert_eq!(Command::parse("volume 0.5").unwrap(), Some(Command::Volume(0.5)));
        assert_eq!(Command::parse("").unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse("drum cowbell").is_err());
        assert!(Command::parse("note 1").is_err());
        assert!(Command::parse("note x 60").is_err());
        assert!(Command::parse("bpm fast").is_err());
        assert!(Command::parse("dance").is_err());
    }
}
