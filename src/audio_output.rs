//! Blocking playback of a tone buffer on the default output device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SizedSample};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use dasp_sample::FromSample;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::tone::ToneBuffer;

/// Extra time allowed past the buffer's length before playback is abandoned.
const PLAYBACK_GRACE: Duration = Duration::from_secs(2);
/// Shortest wait after the last sample is handed over, for hosts that report
/// no output latency.
const MIN_DRAIN: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no output device available")]
    NoOutputDevice,
    #[error("output device does not support {0} Hz")]
    UnsupportedSampleRate(u32),
    #[error("unsupported sample format: {0:?}")]
    UnsupportedSampleFormat(SampleFormat),
    #[error("could not read device name: {0}")]
    DeviceName(#[from] cpal::DeviceNameError),
    #[error("error while querying configs: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),
    #[error("could not build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("could not start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("an error occurred on stream: {0}")]
    Stream(#[from] cpal::StreamError),
    #[error("playback did not finish within {0:?}")]
    Timeout(Duration),
}

/// Something that can play a tone buffer to completion.
pub trait TonePlayer {
    fn play(&mut self, buffer: &ToneBuffer) -> Result<(), AudioError>;
}

/// Opens the default device for each buffer and closes it afterwards.
#[derive(Default)]
pub struct CpalPlayer;

impl TonePlayer for CpalPlayer {
    fn play(&mut self, buffer: &ToneBuffer) -> Result<(), AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        log::info!("Output device: {}", device.name()?);

        let supported_config = choose_config(&device, buffer.sample_rate())?;
        log::info!("Output config: {:?}", supported_config);

        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();

        match sample_format {
            SampleFormat::F32 => run::<f32>(&device, &config, buffer),
            SampleFormat::I16 => run::<i16>(&device, &config, buffer),
            SampleFormat::U16 => run::<u16>(&device, &config, buffer),
            other => Err(AudioError::UnsupportedSampleFormat(other)),
        }
    }
}

/// Used when audio is switched off.
#[derive(Default)]
pub struct SilentPlayer;

impl TonePlayer for SilentPlayer {
    fn play(&mut self, buffer: &ToneBuffer) -> Result<(), AudioError> {
        log::debug!("Muted: skipping {} samples", buffer.samples().len());
        Ok(())
    }
}

fn choose_config(
    device: &cpal::Device,
    sample_rate: u32,
) -> Result<cpal::SupportedStreamConfig, AudioError> {
    let rate = cpal::SampleRate(sample_rate);
    device
        .supported_output_configs()?
        .filter(|range| range.min_sample_rate() <= rate && rate <= range.max_sample_rate())
        .filter(|range| {
            matches!(
                range.sample_format(),
                SampleFormat::F32 | SampleFormat::I16 | SampleFormat::U16
            )
        })
        .min_by_key(|range| (range.channels(), format_rank(range.sample_format())))
        .map(|range| range.with_sample_rate(rate))
        .ok_or(AudioError::UnsupportedSampleRate(sample_rate))
}

fn format_rank(format: SampleFormat) -> u8 {
    match format {
        SampleFormat::F32 => 0,
        SampleFormat::I16 => 1,
        _ => 2,
    }
}

fn run<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: &ToneBuffer,
) -> Result<(), AudioError>
where
    T: Sample + SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let cursor = Arc::new(Mutex::new(PlaybackCursor::new(buffer.samples().to_vec())));
    let sample_rate = config.sample_rate.0;
    let (done_tx, done_rx) = bounded::<Result<Duration, cpal::StreamError>>(1);

    let cursor_clone = Arc::clone(&cursor);
    let finished_tx = done_tx.clone();
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], info: &cpal::OutputCallbackInfo| {
            let timestamp = info.timestamp();
            let latency = timestamp.playback.duration_since(&timestamp.callback);
            write_data(data, channels, sample_rate, latency, &cursor_clone, &finished_tx)
        },
        move |err| {
            log::error!("an error occurred on stream: {}", err);
            let _ = done_tx.try_send(Err(err));
        },
        None,
    )?;

    log::info!("Starting output stream");
    stream.play()?;

    let limit = buffer.duration() + PLAYBACK_GRACE;
    let outcome = match done_rx.recv_timeout(limit) {
        Ok(Ok(drain)) => {
            log::debug!("Draining output for {:?}", drain);
            std::thread::sleep(drain);
            Ok(())
        }
        Ok(Err(err)) => Err(AudioError::Stream(err)),
        Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
            Err(AudioError::Timeout(limit))
        }
    };

    log::info!("Closing output stream");
    drop(stream);
    outcome
}

fn write_data<T>(
    output: &mut [T],
    channels: usize,
    sample_rate: u32,
    latency: Option<Duration>,
    cursor: &Arc<Mutex<PlaybackCursor>>,
    finished: &Sender<Result<Duration, cpal::StreamError>>,
) where
    T: Sample + FromSample<f32>,
{
    if cursor.lock().fill(output, channels) {
        let frames = output.len() / channels.max(1);
        let _ = finished.try_send(Ok(drain_time(latency, frames, sample_rate)));
    }
}

/// How long to keep the stream open after the final callback: the time until
/// that callback's first frame is heard plus the callback's own length.
fn drain_time(latency: Option<Duration>, frames: usize, sample_rate: u32) -> Duration {
    let callback_length = if sample_rate == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(frames as f64 / sample_rate as f64)
    };
    (latency.unwrap_or(Duration::ZERO) + callback_length).max(MIN_DRAIN)
}

/// Read position into a mono buffer shared with the device callback.
pub struct PlaybackCursor {
    samples: Vec<f32>,
    position: usize,
    reported: bool,
}

impl PlaybackCursor {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            position: 0,
            reported: false,
        }
    }

    /// Copy the next frames into `output`, one mono sample per frame on every
    /// channel, with silence after the end. Returns true exactly once: on the
    /// first call that finds the buffer exhausted.
    pub fn fill<T>(&mut self, output: &mut [T], channels: usize) -> bool
    where
        T: Sample + FromSample<f32>,
    {
        for frame in output.chunks_mut(channels.max(1)) {
            let value = match self.samples.get(self.position) {
                Some(&sample) => {
                    self.position += 1;
                    T::from_sample(sample)
                }
                None => T::EQUILIBRIUM,
            };
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }

        if self.position >= self.samples.len() && !self.reported {
            self.reported = true;
            return true;
        }
        false
    }
}
