//! Core data types: the design tree, the manifest and the saved snapshot.

pub mod manifest;
pub mod node;

pub use manifest::{Manifest, ManifestStats, Snapshot, SnapshotEntry};
pub use node::{
    Annotations, AxisAlign, BlurEffect, Color, ColorStop, Constraint, Constraints,
    ContainerProps, CornerRadius, DesignNode, Easing, Effect, FlowLayout, GradientPaint,
    GradientShape, ImagePaint, InferredStroke, LayoutAxis, NodeKind, Paint, RasterRef,
    Reaction, Rect, ShadowEffect, Sizing, SolidPaint, TextAlignHorizontal, TextAlignVertical,
    TextCase, TextDecoration, TextPayload, TextStyle, Transition, Trigger, Vector,
};
