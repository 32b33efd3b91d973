use cpal::{
    BufferSize, Device, OutputCallbackInfo, SampleRate, StreamConfig,
    SupportedBufferSize,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use siren_core::pcm;
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, RecvTimeoutError},
    },
    time::Duration,
};

/// How often a blocked write checks whether it has been asked to stop.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// default: 0.05
    pub target_latency_s: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_latency_s: 0.05,
        }
    }
}

/// How a write to the sink ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Finished,
    Interrupted,
}

/// Stops a sink from another thread, such as a signal handler. Once stopped the sink outputs
/// silence and every write returns `Playback::Interrupted`.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Drained;

/// Samples waiting to be played, shared between the writing thread and the cpal thread.
#[derive(Default)]
struct Queue {
    samples: Vec<f32>,
    cursor: usize,
    awaiting_drain: bool,
}

impl Queue {
    fn load(&mut self, samples: Vec<f32>) {
        self.samples = samples;
        self.cursor = 0;
        self.awaiting_drain = true;
    }

    fn clear(&mut self) {
        self.samples.clear();
        self.cursor = 0;
        self.awaiting_drain = false;
    }

    /// Copy the next frames into an interleaved device buffer, duplicating each mono sample
    /// across all channels and padding with silence once the samples run out. Returns true the
    /// first time the queue runs dry after a load.
    fn fill(&mut self, data: &mut [f32], channels: usize) -> bool {
        for frame in data.chunks_mut(channels) {
            let sample = match self.samples.get(self.cursor) {
                Some(&sample) => {
                    self.cursor += 1;
                    sample
                }
                None => 0.0,
            };
            frame.fill(sample);
        }
        if self.awaiting_drain && self.cursor >= self.samples.len() {
            self.awaiting_drain = false;
            true
        } else {
            false
        }
    }
}

pub struct Player {
    device: Device,
}

impl Player {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or(anyhow::anyhow!("no output device"))?;
        if let Ok(name) = device.name() {
            log::info!("cpal device: {}", name);
        } else {
            log::info!("cpal device: (no name)");
        }
        Ok(Self { device })
    }

    fn choose_config(
        &self,
        sample_rate_hz: u32,
        config: Config,
    ) -> anyhow::Result<StreamConfig> {
        let default_config = self.device.default_output_config()?;
        let channels = default_config.channels().max(1) as u32;
        let ideal_buffer_size =
            (sample_rate_hz as f32 * config.target_latency_s) as u32 * channels;
        // Round down to a multiple of 4. Alsa complains if the buffer size is not evenly
        // divisible by 4.
        let ideal_buffer_size = ideal_buffer_size & (!3);
        let buffer_size = match default_config.buffer_size() {
            SupportedBufferSize::Range { min, max } => {
                BufferSize::Fixed(ideal_buffer_size.clamp(*min, *max))
            }
            SupportedBufferSize::Unknown => BufferSize::Default,
        };
        Ok(StreamConfig {
            channels: channels as u16,
            sample_rate: SampleRate(sample_rate_hz),
            buffer_size,
        })
    }

    /// Open a mono output stream at `sample_rate_hz` and start it. It plays silence until
    /// something is written.
    pub fn open(&self, sample_rate_hz: u32, config: Config) -> anyhow::Result<Sink> {
        let config = self.choose_config(sample_rate_hz, config)?;
        log::info!("sample rate: {}", config.sample_rate.0);
        log::info!("num channels: {}", config.channels);
        log::info!("buffer size: {:?}", config.buffer_size);
        let queue = Arc::new(Mutex::new(Queue::default()));
        let stop = StopHandle::default();
        let (send_drained, recv_drained) = mpsc::channel::<Drained>();
        let stream = self.device.build_output_stream(
            &config,
            {
                let queue = Arc::clone(&queue);
                let stop = stop.clone();
                let channels = config.channels as usize;
                move |data: &mut [f32], _: &OutputCallbackInfo| {
                    let mut queue =
                        queue.lock().expect("writing thread has panicked");
                    if stop.is_stopped() {
                        queue.clear();
                        data.fill(0.0);
                        return;
                    }
                    if queue.fill(data, channels) {
                        // the writer may have given up waiting
                        let _ = send_drained.send(Drained);
                    }
                }
            },
            |err| log::error!("stream error: {}", err),
            None,
        )?;
        stream.play()?;
        Ok(Sink {
            stream,
            queue,
            recv_drained,
            stop,
            sample_rate_hz,
        })
    }
}

/// An open audio output stream accepting raw mono f32 samples.
pub struct Sink {
    stream: cpal::Stream,
    queue: Arc<Mutex<Queue>>,
    recv_drained: mpsc::Receiver<Drained>,
    stop: StopHandle,
    sample_rate_hz: u32,
}

impl Sink {
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    fn clear(&self) -> anyhow::Result<()> {
        self.queue
            .lock()
            .map_err(|_| anyhow::anyhow!("audio thread has panicked"))?
            .clear();
        Ok(())
    }

    /// Play a buffer of native-endian f32 samples, blocking until the device has taken all of
    /// them or the sink is stopped.
    pub fn write(&self, bytes: &[u8]) -> anyhow::Result<Playback> {
        let samples = pcm::deserialize(bytes)?;
        if self.stop.is_stopped() {
            return Ok(Playback::Interrupted);
        }
        if samples.is_empty() {
            return Ok(Playback::Finished);
        }
        log::info!(
            "playing {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f64 / self.sample_rate_hz as f64
        );
        // discard a notification left over from an earlier write
        while self.recv_drained.try_recv().is_ok() {}
        self.queue
            .lock()
            .map_err(|_| anyhow::anyhow!("audio thread has panicked"))?
            .load(samples);
        loop {
            match self.recv_drained.recv_timeout(STOP_POLL_INTERVAL) {
                Ok(Drained) => return Ok(Playback::Finished),
                Err(RecvTimeoutError::Timeout) => {
                    if self.stop.is_stopped() {
                        self.clear()?;
                        log::info!("playback interrupted");
                        return Ok(Playback::Interrupted);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    anyhow::bail!("audio stream stopped unexpectedly")
                }
            }
        }
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        if let Err(e) = self.stream.pause() {
            log::warn!("failed to pause audio stream: {}", e);
        }
        log::info!("closed audio stream");
    }
}
