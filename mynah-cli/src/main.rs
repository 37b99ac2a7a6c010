mod store;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mynah_api::client::ApiClient;
use mynah_core::{AudioClip, AudioEncoding, Sender};
use mynah_engine::chat::ChatClient;
use mynah_engine::state::Outcome;
use mynah_engine::traits::{CaptureHandle, CaptureSpec, Microphone, SpeechSink};

use crate::store::ConfigStore;

/// Real microphone behind the engine's capability trait. CPAL hands us raw
/// PCM, so WAV is the only encoding this device can deliver.
struct CpalMicrophone {
    device_name: Option<String>,
}

#[async_trait::async_trait]
impl Microphone for CpalMicrophone {
    fn is_supported(&self, encoding: AudioEncoding) -> bool {
        encoding == AudioEncoding::Wav
    }

    async fn open(
        &self,
        spec: &CaptureSpec,
        encoding: AudioEncoding,
    ) -> anyhow::Result<Box<dyn CaptureHandle>> {
        if encoding != AudioEncoding::Wav {
            anyhow::bail!("unsupported capture encoding: {encoding:?}");
        }

        let device_name = self.device_name.clone();
        let target_rate = spec.sample_rate_hz;
        let recorder = tokio::task::spawn_blocking(move || {
            let recorder = mynah_audio::AudioRecorder::open_named(device_name.as_deref())?;
            recorder.start()?;
            Ok::<_, mynah_audio::AudioCaptureError>(recorder)
        })
        .await??;

        Ok(Box::new(CpalCapture {
            recorder: Some(recorder),
            target_rate,
        }))
    }
}

struct CpalCapture {
    recorder: Option<mynah_audio::AudioRecorder>,
    target_rate: u32,
}

#[async_trait::async_trait]
impl CaptureHandle for CpalCapture {
    async fn finish(mut self: Box<Self>) -> anyhow::Result<AudioClip> {
        let recorder = self
            .recorder
            .take()
            .ok_or_else(|| anyhow::anyhow!("capture already finished"))?;
        let target_rate = self.target_rate;

        // Dropping the recorder shuts the worker down even when stop fails,
        // so the device is released on every path.
        let bytes = tokio::task::spawn_blocking(move || {
            let captured = recorder.stop()?;
            recorder.close();
            let resampled = mynah_audio::resample_mono_f32(
                &captured.samples,
                captured.sample_rate_hz,
                target_rate,
            )?;
            Ok::<_, anyhow::Error>(mynah_audio::encode_wav_mono_f32le(&resampled, target_rate))
        })
        .await??;

        Ok(AudioClip::new(AudioEncoding::Wav, bytes))
    }
}

/// Playback "device" for a terminal: each clip lands as a file under the
/// system temp directory and its path is printed, so any player can open
/// it. Completion is immediate from the engine's point of view.
struct FileSpeechSink {
    current: Mutex<Option<PathBuf>>,
    counter: Mutex<u32>,
}

impl FileSpeechSink {
    fn new() -> Self {
        Self {
            current: Mutex::new(None),
            counter: Mutex::new(0),
        }
    }
}

#[async_trait::async_trait]
impl SpeechSink for FileSpeechSink {
    async fn start(&self, clip: AudioClip) -> anyhow::Result<()> {
        let n = {
            let mut counter = self.counter.lock().unwrap();
            *counter += 1;
            *counter
        };
        let path = std::env::temp_dir().join(format!(
            "mynah-reply-{}-{n}.{}",
            std::process::id(),
            clip.encoding.extension()
        ));
        std::fs::write(&path, &clip.bytes)?;
        println!("[audio] saved to {}", path.display());
        *self.current.lock().unwrap() = Some(path);
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        if let Some(path) = self.current.lock().unwrap().take() {
            let _ = std::fs::remove_file(path);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let store = ConfigStore::from_env();
    let mut cfg = store.load_or_default()?;
    if let Ok(url) = std::env::var("MYNAH_BASE_URL") {
        cfg.client.base_url = url;
    }

    let api = ApiClient::new(cfg.client.clone())?;
    match api.health().await {
        Ok(()) => log::info!("service reachable at {}", api.base_url()),
        Err(e) => eprintln!("warning: service not reachable at {}: {e}", api.base_url()),
    }

    let microphone = Arc::new(CpalMicrophone {
        device_name: cfg.microphone_device.clone(),
    });
    let client = ChatClient::new(api, microphone, Arc::new(FileSpeechSink::new()));

    println!("mynah: chat with {}", cfg.client.base_url);
    println!(
        "commands: :clear  :ingest <path|url>  :record  :stop  :send  :say <n>  :quit; anything else is a chat turn"
    );

    let mut printed = 0usize;
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest.trim())) {
            (":quit", _) | (":q", _) => break,
            (":clear", _) => {
                client.clear_context().await;
                printed = 0;
            }
            (":ingest", "") => println!("usage: :ingest <path|url>"),
            (":ingest", target) => {
                ingest(&client, target).await;
            }
            (":record", _) => {
                if client.start_recording().await == Outcome::Completed {
                    println!("[recording, :stop to finish]");
                }
            }
            (":stop", _) => {
                client.stop_recording().await;
                // Transcription only fills the draft; sending stays manual.
                let draft = client.state().draft();
                if !draft.is_empty() {
                    println!("[transcript] {draft}  (:send to submit, or type to replace)");
                }
            }
            (":send", _) => {
                client.submit().await;
            }
            (":say", arg) => match arg.parse::<usize>() {
                Ok(index) => {
                    client.toggle_playback(index).await;
                    // The file sink finishes as soon as the clip is written.
                    if client.state().playback().playing().is_some() {
                        client.playback_finished();
                    }
                }
                Err(_) => println!("usage: :say <message index>"),
            },
            _ => {
                client.set_draft(line);
                client.submit().await;
            }
        }

        printed = print_new_messages(&client, printed);
        if let Some(banner) = client.state().banner() {
            eprintln!("[error] {banner}");
        }
    }

    store.save(&cfg)?;
    Ok(())
}

async fn ingest(client: &ChatClient, target: &str) {
    if target.starts_with("http://") || target.starts_with("https://") {
        client.set_url(target);
    } else {
        let path = Path::new(target);
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            println!("not a file path: {target}");
            return;
        };
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                println!("cannot read {target}: {e}");
                return;
            }
        };
        if !client.select_file(filename, bytes) {
            return;
        }
    }
    client.upload().await;
}

fn print_new_messages(client: &ChatClient, printed: usize) -> usize {
    let messages = client.state().messages();
    for message in &messages[printed.min(messages.len())..] {
        let tag = match message.sender {
            Sender::User => "you",
            Sender::Bot => "bot",
            Sender::Error => "err",
        };
        println!("[{tag}] {}", message.text);
    }
    messages.len()
}
