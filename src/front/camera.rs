pub const CAMERA_DENIED_MESSAGE: &str =
    "I couldn't open the camera. Please allow camera access and try again.";

/// A live camera stream. `stop` ends every track of the stream.
pub trait CameraStream {
    fn stop(&mut self);

    /// The view closed while `attempt` was still waiting for permission. Any
    /// stream that request yields later must be stopped where it arrives.
    fn abandon(_attempt: CameraAttempt)
    where
        Self: Sized,
    {
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CameraPhase {
    #[default]
    Closed,
    RequestingPermission,
    Streaming,
    Denied(String),
}

/// One permission request. A grant for an outdated attempt is released at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraAttempt(u64);

impl CameraAttempt {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Owns the camera stream for as long as the camera view is open.
#[derive(Debug)]
pub struct CameraFlow<S: CameraStream> {
    phase: CameraPhase,
    stream: Option<S>,
    attempt: u64,
    capturing: bool,
}

impl<S: CameraStream> Default for CameraFlow<S> {
    fn default() -> Self {
        Self { phase: CameraPhase::Closed, stream: None, attempt: 0, capturing: false }
    }
}

impl<S: CameraStream> CameraFlow<S> {
    pub fn phase(&self) -> &CameraPhase {
        &self.phase
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn open(&mut self) -> Option<CameraAttempt> {
        if matches!(self.phase, CameraPhase::RequestingPermission | CameraPhase::Streaming) {
            return None;
        }
        self.attempt += 1;
        self.phase = CameraPhase::RequestingPermission;
        Some(CameraAttempt(self.attempt))
    }

    pub fn granted(&mut self, attempt: CameraAttempt, mut stream: S) -> bool {
        if !self.is_pending(attempt) {
            stream.stop();
            return false;
        }
        self.stream = Some(stream);
        self.phase = CameraPhase::Streaming;
        true
    }

    pub fn denied(&mut self, attempt: CameraAttempt, reason: Option<String>) {
        if self.is_pending(attempt) {
            tracing::warn!("Camera unavailable: {}", reason.as_deref().unwrap_or("unknown"));
            self.phase = CameraPhase::Denied(CAMERA_DENIED_MESSAGE.to_owned());
        }
    }

    pub fn can_capture(&self) -> bool {
        self.phase == CameraPhase::Streaming && !self.capturing
    }

    /// Marks a capture as in flight. Returns `false` when capture is not offered.
    pub fn begin_capture(&mut self) -> bool {
        if !self.can_capture() {
            return false;
        }
        self.capturing = true;
        true
    }

    /// A successful capture closes the view.
    pub fn finish_capture(&mut self, success: bool) {
        self.capturing = false;
        if success {
            self.close();
        }
    }

    pub fn close(&mut self) {
        self.release();
        self.attempt += 1;
        self.capturing = false;
        self.phase = CameraPhase::Closed;
    }

    fn is_pending(&self, attempt: CameraAttempt) -> bool {
        self.phase == CameraPhase::RequestingPermission && attempt.0 == self.attempt
    }

    fn release(&mut self) {
        if self.phase == CameraPhase::RequestingPermission {
            S::abandon(CameraAttempt(self.attempt));
        }
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}

impl<S: CameraStream> Drop for CameraFlow<S> {
    fn drop(&mut self) {
        self.release();
    }
}
