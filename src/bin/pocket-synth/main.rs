//! pocket-synth - play the synthesizer from a terminal
//!
//! Run with: cargo run -- --bpm 100
//! Set RUST_LOG=pocket_synth=debug to watch voice allocation.

mod audio;
mod repl;

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use pocket_synth::sequencing::{PlaybackLoop, Sequencer};
use pocket_synth::synth::message::{self, SynthSender};
use pocket_synth::synth::SynthMessage;
use pocket_synth::{SharedSynth, SynthConfig, Synthesizer};

use repl::{Command, HELP};

/// Velocity for notes typed at the prompt.
const NOTE_VELOCITY: f32 = 0.5;
const QUEUE_CAPACITY: usize = 256;

#[derive(Parser, Debug)]
#[command(name = "pocket-synth", version, about = "Polyphonic ADSR synth with a drum sequencer")]
struct Args {
    /// Pattern tempo, clamped to 60-240
    #[arg(long, default_value_t = 120)]
    bpm: u32,

    /// Pattern and master volume, 0-1
    #[arg(long, default_value_t = 0.8)]
    volume: f32,

    /// Seed the drum noise for repeatable output
    #[arg(long)]
    seed: Option<u64>,
}

struct Session {
    synth: SharedSynth,
    tx: SynthSender,
    sequencer: Arc<Mutex<Sequencer>>,
    playback: Option<PlaybackLoop>,
}

impl Session {
    fn sequencer(&self) -> std::sync::MutexGuard<'_, Sequencer> {
        self.sequencer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn send(&mut self, msg: SynthMessage) {
        if let Err(err) = self.tx.send(msg) {
            eprintln!("{err}");
        }
    }

    /// Returns false once the session should end.
    fn run(&mut self, command: Command) -> bool {
        match command {
            Command::Play => {
                if self.playback.is_none() {
                    self.playback = Some(PlaybackLoop::start(
                        Arc::clone(&self.sequencer),
                        self.synth.clone(),
                    ));
                }
                println!("playing at {} bpm", self.sequencer().bpm());
            }
            Command::Pause => {
                if let Some(playback) = self.playback.take() {
                    drop(playback);
                    let mut seq = self.sequencer();
                    seq.pause(&mut self.synth.lock());
                    println!("paused at step {}", seq.current_step());
                }
            }
            Command::Stop => match self.playback.take() {
                Some(playback) => playback.stop(),
                None => self.send(SynthMessage::AllNotesOff),
            },
            Command::Drum(preset) => {
                let velocity = self.sequencer().volume();
                self.send(SynthMessage::Drum { preset, velocity });
            }
            Command::NoteOn { channel, note } => self.send(SynthMessage::NoteOn {
                channel,
                note,
                velocity: NOTE_VELOCITY,
            }),
            Command::NoteOff { channel, note } => self.send(SynthMessage::NoteOff { channel, note }),
            Command::Bpm(bpm) => {
                let mut seq = self.sequencer();
                seq.set_bpm(bpm);
                println!("tempo {} bpm", seq.bpm());
            }
            Command::Volume(volume) => {
                let mut seq = self.sequencer();
                seq.set_volume(volume);
                let volume = seq.volume();
                drop(seq);
                self.send(SynthMessage::SetMasterVolume(volume));
                println!("volume {volume:.2}");
            }
            Command::Status => {
                let seq = self.sequencer();
                let synth = self.synth.lock();
                println!(
                    "voices {}/{}  drum hits {}  step {}  {} bpm  {}",
                    synth.active_voices(),
                    pocket_synth::MAX_VOICES,
                    synth.active_drum_hits(),
                    seq.current_step(),
                    seq.bpm(),
                    if seq.is_playing() { "playing" } else { "stopped" }
                );
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
        }
        true
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();
    let args = Args::parse();

    let mut config = SynthConfig::new().master_volume(args.volume);
    if let Some(seed) = args.seed {
        config = config.noise_seed(seed);
    }
    let synth = SharedSynth::new(Synthesizer::with_config(config));

    let mut sequencer = Sequencer::new();
    sequencer.set_bpm(args.bpm);
    sequencer.set_volume(args.volume);

    let (tx, rx) = message::channel(QUEUE_CAPACITY);
    let _stream = audio::start(synth.clone(), rx)?;

    let mut session = Session {
        synth,
        tx,
        sequencer: Arc::new(Mutex::new(sequencer)),
        playback: None,
    };

    println!("=== pocket-synth ===");
    println!("{HELP}");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush().wrap_err("failed to flush stdout")?;

        let Some(line) = lines.next() else { break };
        let line = line.wrap_err("failed to read stdin")?;

        match Command::parse(&line) {
            Ok(Some(command)) => {
                if !session.run(command) {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => eprintln!("{err:#}"),
        }
    }

    if let Some(playback) = session.playback.take() {
        playback.stop();
    }
    Ok(())
}
