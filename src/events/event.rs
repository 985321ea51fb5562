use serde::{Deserialize, Serialize};

use crate::elements::{EntityId, LinkId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadEntitySelected {
    /// `None` when the selection was cleared.
    pub id: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadPathFound {
    pub start: EntityId,
    pub end: EntityId,
    /// Empty when the endpoints are not connected.
    pub path: Vec<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDragStart {
    pub id: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDragEnd {
    pub id: EntityId,
    /// Final canvas position.
    pub pos: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadPan {
    pub diff: [f32; 2],
    pub new_pan: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadZoom {
    pub diff: f32,
    pub new_zoom: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadHoverChanged {
    pub entity: Option<EntityId>,
    pub link: Option<LinkId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    EntitySelected(PayloadEntitySelected),
    PathFound(PayloadPathFound),
    NodeDragStart(PayloadNodeDragStart),
    NodeDragEnd(PayloadNodeDragEnd),
    Pan(PayloadPan),
    Zoom(PayloadZoom),
    HoverChanged(PayloadHoverChanged),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_contract_entity_selected() {
        let event = Event::EntitySelected(PayloadEntitySelected {
            id: Some("E1".to_string()),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"EntitySelected":{"id":"E1"}}"#);

        let cleared: Event = serde_json::from_str(r#"{"EntitySelected":{"id":null}}"#).unwrap();
        assert_eq!(
            cleared,
            Event::EntitySelected(PayloadEntitySelected { id: None })
        );
    }

    #[test]
    fn test_contract_path_found() {
        let event = Event::PathFound(PayloadPathFound {
            start: "A".to_string(),
            end: "C".to_string(),
            path: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"PathFound":{"start":"A","end":"C","path":["A","B","C"]}}"#
        );
    }

    #[test]
    fn test_contract_pan() {
        let event = Event::Pan(PayloadPan {
            diff: [1.0, 2.0],
            new_pan: [3.0, 4.0],
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"Pan":{"diff":[1.0,2.0],"new_pan":[3.0,4.0]}}"#);

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_contract_zoom() {
        let event = Event::Zoom(PayloadZoom {
            diff: 0.1,
            new_zoom: 1.1,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"Zoom":{"diff":0.1,"new_zoom":1.1}}"#);
    }
}
