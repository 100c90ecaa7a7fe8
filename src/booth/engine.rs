use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::{
    capture::{CaptureScheduler, CaptureSession, FrameSource, Photo},
    config::Config,
    error::Result,
    pipeline::FilterPipeline,
    strip::{ImageHandle, StripCompositor},
};

/// Which of the session's two photo sequences a download command targets
#[derive(Debug, Clone, Copy)]
enum PhotoSet {
    Raw,
    Sepia,
}

impl PhotoSet {
    fn photo_stem(self) -> &'static str {
        match self {
            Self::Raw => "photo",
            Self::Sepia => "sepia-photo",
        }
    }

    fn strip_stem(self) -> &'static str {
        match self {
            Self::Raw => "photostrip",
            Self::Sepia => "sepia-photostrip",
        }
    }
}

/// The photobooth engine
///
/// Owns the capture session and wires the scheduler, frame source, filter
/// pipeline, and strip compositor together:
/// 1. `start_capture` resets the session and drives the scheduler from a
///    timer task, one tick per configured period
/// 2. Each captured photo is appended to the raw sequence and handed to a
///    fire-and-forget filter task tagged with the current run id
/// 3. Completed sepia photos accumulate in completion order; results from a
///    superseded run are dropped by the run-id check
/// 4. Download commands write the photo sets, or their composed photostrip,
///    as PNG files
///
/// Download commands follow the UI contract: failures are logged, never
/// returned — the only user-visible symptom is the absence of a file.
pub struct PhotoBooth {
    config: Config,
    session: Arc<Mutex<CaptureSession>>,
    source: Arc<Mutex<Box<dyn FrameSource>>>,
    pipeline: Option<Arc<dyn FilterPipeline>>,
    compositor: Arc<StripCompositor>,
    ticker: Option<JoinHandle<()>>,
}

impl PhotoBooth {
    /// Create a booth over a frame source and an optional filter pipeline
    ///
    /// Without a pipeline, captured photos are never filtered and the sepia
    /// sequence stays empty.
    pub fn new(
        config: Config,
        source: Box<dyn FrameSource>,
        pipeline: Option<Arc<dyn FilterPipeline>>,
    ) -> Result<Self> {
        config.validate()?;
        let compositor = Arc::new(StripCompositor::new(config.strip.clone())?);

        Ok(Self {
            session: Arc::new(Mutex::new(CaptureSession::new())),
            source: Arc::new(Mutex::new(source)),
            pipeline,
            compositor,
            ticker: None,
            config,
        })
    }

    /// Shared handle to the capture session, for observing run state
    pub fn session(&self) -> Arc<Mutex<CaptureSession>> {
        Arc::clone(&self.session)
    }

    /// Begin a capture run
    ///
    /// Calling this while a run is active (or after one completed) is always
    /// a clean restart: the previous ticker is cancelled and both photo
    /// sequences are cleared before the new countdown starts.
    pub async fn start_capture(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }

        let countdown_from = self.config.capture.countdown_from;
        let run_id = self.session.lock().await.begin_run(countdown_from);
        info!("Capture run {} started, countdown from {}", run_id, countdown_from);

        let mut scheduler = CaptureScheduler::new(self.config.capture.clone());
        scheduler.start();

        let session = Arc::clone(&self.session);
        let source = Arc::clone(&self.source);
        let pipeline = self.pipeline.clone();
        let period = Duration::from_millis(self.config.capture.tick_interval_ms);

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval(period);
            // The first interval tick completes immediately; the countdown
            // starts one full period later
            interval.tick().await;

            loop {
                interval.tick().await;

                let outcome = {
                    let mut source = source.lock().await;
                    scheduler.tick(&mut **source)
                };

                {
                    let mut session = session.lock().await;
                    session.set_countdown(outcome.countdown);
                    if let Some(photo) = &outcome.captured {
                        session.push_photo(photo.clone());
                        debug!("Raw photo {} captured", session.photos().len());
                    }
                }

                if let (Some(photo), Some(pipeline)) = (outcome.captured, pipeline.as_ref()) {
                    Self::spawn_filter(Arc::clone(pipeline), Arc::clone(&session), run_id, photo);
                }

                if outcome.finished {
                    session.lock().await.end_run();
                    info!("Capture run {} complete", run_id);
                    break;
                }
            }
        }));
    }

    /// Hand one captured photo to the filter pipeline, fire-and-forget
    fn spawn_filter(
        pipeline: Arc<dyn FilterPipeline>,
        session: Arc<Mutex<CaptureSession>>,
        run_id: u64,
        photo: Photo,
    ) {
        tokio::spawn(async move {
            match pipeline.filter(&photo).await {
                Ok(sepia) => {
                    let mut session = session.lock().await;
                    if session.push_sepia(run_id, sepia) {
                        debug!("Sepia photo {} ready", session.sepia_photos().len());
                    } else {
                        debug!("Dropping sepia result from superseded run {}", run_id);
                    }
                }
                Err(e) => {
                    // The photo is simply absent from the sepia sequence
                    warn!("Filter pipeline failed, photo dropped: {}", e);
                }
            }
        });
    }

    /// Stop the current run
    ///
    /// Cancels the ticker and zeroes the countdown. In-flight filter
    /// requests are left running; their late results are discarded by the
    /// run-id check once a new run begins.
    pub async fn stop_capture(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.session.lock().await.end_run();
        info!("Capture stopped");
    }

    /// Wait for the current run to finish on its own
    pub async fn wait(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.await;
        }
    }

    /// Write the raw photos as `photo-N.png` files into `dir`
    pub async fn download_raw<P: AsRef<Path>>(&self, dir: P) {
        self.save_photo_set(PhotoSet::Raw, dir.as_ref()).await;
    }

    /// Write the sepia photos as `sepia-photo-N.png` files into `dir`
    pub async fn download_filtered<P: AsRef<Path>>(&self, dir: P) {
        self.save_photo_set(PhotoSet::Sepia, dir.as_ref()).await;
    }

    /// Compose the raw photos into `photostrip.png` inside `dir`
    pub async fn download_raw_strip<P: AsRef<Path>>(&self, dir: P) {
        self.save_strip(PhotoSet::Raw, dir.as_ref()).await;
    }

    /// Compose the sepia photos into `sepia-photostrip.png` inside `dir`
    pub async fn download_filtered_strip<P: AsRef<Path>>(&self, dir: P) {
        self.save_strip(PhotoSet::Sepia, dir.as_ref()).await;
    }

    async fn photo_set(&self, set: PhotoSet) -> Vec<Photo> {
        let session = self.session.lock().await;
        match set {
            PhotoSet::Raw => session.photos().to_vec(),
            PhotoSet::Sepia => session.sepia_photos().to_vec(),
        }
    }

    async fn save_photo_set(&self, set: PhotoSet, dir: &Path) {
        let photos = self.photo_set(set).await;
        if photos.is_empty() {
            warn!("Need at least one {} to download", set.photo_stem());
            return;
        }

        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Cannot create download directory {:?}: {}", dir, e);
            return;
        }

        for (index, photo) in photos.iter().enumerate() {
            let path = dir.join(format!("{}-{}.png", set.photo_stem(), index + 1));
            match photo.save_png(&path) {
                Ok(()) => info!("Saved {:?}", path),
                Err(e) => warn!("Failed to save {:?}: {}", path, e),
            }
        }
    }

    async fn save_strip(&self, set: PhotoSet, dir: &Path) {
        let handles: Vec<ImageHandle> = self
            .photo_set(set)
            .await
            .into_iter()
            .map(ImageHandle::from)
            .collect();

        let strip = match self.compositor.compose(&handles).await {
            Ok(strip) => strip,
            Err(e) => {
                warn!("Photostrip not produced: {}", e);
                return;
            }
        };

        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Cannot create download directory {:?}: {}", dir, e);
            return;
        }

        let path: PathBuf = dir.join(format!("{}.png", set.strip_stem()));
        match strip.save_png(&path) {
            Ok(()) => info!("Saved {:?}", path),
            Err(e) => warn!("Failed to save {:?}: {}", path, e),
        }
    }
}
