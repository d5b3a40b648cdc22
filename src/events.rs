#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    TimerEvent(TimerEvent),
    AppEvent(AppEvent),
}

/// Changes to the delay between generations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SpeedUp,
    SlowDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    CameraEvent(CameraEvent),

    /// The terminal changed size
    Resize { cols: u16, rows: u16 },

    /// Exit the application
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraEvent {
    Move(Direction),
    ZoomIn,
    ZoomOut,

    /// Center the view on the live cells again
    ResetView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}
