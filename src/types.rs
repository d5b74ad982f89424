use std::collections::BTreeMap;
use std::sync::Arc;

/// Fingers of one hand, keyed by the driver's per-hand finger id.
pub type FingerMap = BTreeMap<i32, Finger>;

/// Hands of one frame, keyed by the driver's per-frame hand id.
pub type HandMap = BTreeMap<i32, Hand>;

/// 3D vector in sensor space. Millimeters unless noted otherwise.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Snapshot of one tracked finger (or held tool).
#[derive(Debug, Clone, Default)]
pub struct Finger {
    position: Vec3,
    direction: Vec3,
    velocity: Vec3,
    length: f32,
    width: f32,
    is_tool: bool,
}

impl Finger {
    pub(crate) fn new(
        position: Vec3,
        direction: Vec3,
        velocity: Vec3,
        length: f32,
        width: f32,
        is_tool: bool,
    ) -> Self {
        Self {
            position,
            direction,
            velocity,
            length,
            width,
            is_tool,
        }
    }

    /// Tip position in millimeters.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Normalized pointing direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Tip velocity in millimeters per second.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Visible length in millimeters.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Average width in millimeters.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// True if this is a held tool (pen, stylus) rather than a bare finger.
    pub fn is_tool(&self) -> bool {
        self.is_tool
    }
}

/// Snapshot of one tracked hand with its fingers.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    fingers: FingerMap,
    position: Vec3,
    direction: Vec3,
    velocity: Vec3,
    normal: Vec3,
    ball_position: Vec3,
    ball_radius: f32,
}

impl Hand {
    pub(crate) fn new(
        fingers: FingerMap,
        position: Vec3,
        direction: Vec3,
        velocity: Vec3,
        normal: Vec3,
        ball_position: Vec3,
        ball_radius: f32,
    ) -> Self {
        Self {
            fingers,
            position,
            direction,
            velocity,
            normal,
            ball_position,
            ball_radius,
        }
    }

    /// Fingers of this hand. Complete as of the frame's capture instant.
    pub fn fingers(&self) -> &FingerMap {
        &self.fingers
    }

    /// Palm position in millimeters.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Normalized direction from the palm towards the fingers.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Palm velocity in millimeters per second.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Palm normal, pointing out of the palm face.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Center of the sphere fitted to the hand's curvature.
    pub fn ball_position(&self) -> Vec3 {
        self.ball_position
    }

    /// Radius of the fitted sphere in millimeters.
    pub fn ball_radius(&self) -> f32 {
        self.ball_radius
    }
}

/// One complete tracking snapshot.
///
/// Cloning is cheap: the hand map is shared behind an `Arc` and never
/// mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    hands: Arc<HandMap>,
    id: i64,
    timestamp: i64,
}

impl Frame {
    pub(crate) fn new(hands: HandMap, id: i64, timestamp: i64) -> Self {
        Self {
            hands: Arc::new(hands),
            id,
            timestamp,
        }
    }

    /// Tracked hands, keyed by hand id.
    pub fn hands(&self) -> &HandMap {
        &self.hands
    }

    /// Driver frame id. Non-decreasing, may skip values between deliveries.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Capture time in microseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
