use crate::capture::photo::Photo;

/// Shared state of one capture run
///
/// Holds the ordered raw and sepia photo sequences, the countdown value the
/// UI observes, and the capturing flag. Every run gets a fresh id; sepia
/// results carry the id of the run that started them and are dropped if a
/// restart happened while they were in flight.
#[derive(Debug, Default)]
pub struct CaptureSession {
    run_id: u64,
    photos: Vec<Photo>,
    sepia_photos: Vec<Photo>,
    countdown: u32,
    capturing: bool,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw captures for the current run, in capture order
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Sepia results for the current run, in completion order
    pub fn sepia_photos(&self) -> &[Photo] {
        &self.sepia_photos
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Start a fresh run: clear both sequences, bump the run id
    ///
    /// Returns the new run id, which filter tasks carry so late results from
    /// an earlier run can be recognized and dropped.
    pub fn begin_run(&mut self, countdown_from: u32) -> u64 {
        self.run_id += 1;
        self.photos.clear();
        self.sepia_photos.clear();
        self.countdown = countdown_from;
        self.capturing = true;
        self.run_id
    }

    /// End the current run (quota reached or explicit stop)
    pub fn end_run(&mut self) {
        self.capturing = false;
        self.countdown = 0;
    }

    pub fn set_countdown(&mut self, countdown: u32) {
        self.countdown = countdown;
    }

    /// Append a raw capture
    pub fn push_photo(&mut self, photo: Photo) {
        self.photos.push(photo);
    }

    /// Append a sepia result if it belongs to the current run
    ///
    /// Returns false (and drops the photo) when `run_id` is stale, i.e. the
    /// session was reset while the filter request was in flight.
    pub fn push_sepia(&mut self, run_id: u64, photo: Photo) -> bool {
        if run_id != self.run_id {
            return false;
        }
        self.sepia_photos.push(photo);
        true
    }
}
