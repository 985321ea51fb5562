mod event;
mod sink;

pub use event::{
    Event, PayloadEntitySelected, PayloadHoverChanged, PayloadNodeDragEnd, PayloadNodeDragStart,
    PayloadPan, PayloadPathFound, PayloadZoom,
};

pub use sink::EventSink;
