use serde_json::{json, Value};

/// One scene of a template render; maps 1:1 to a carousel slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneInput {
    pub title: String,
    pub body: String,
    pub visual_hint: Option<String>,
    pub use_expert_photo: bool,
}

/// Input for `POST /v2/videos/from-templates`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVideoPayload {
    pub template_id: String,
    pub script: String,
    pub caption: Option<String>,
    pub scenes: Vec<SceneInput>,
    pub style: Option<String>,
}

impl CreateVideoPayload {
    /// Wire body with camelCase keys and `render` always on.
    #[must_use]
    pub fn to_request_body(&self) -> Value {
        let scenes: Vec<Value> = self
            .scenes
            .iter()
            .map(|scene| {
                json!({
                    "title": scene.title,
                    "body": scene.body,
                    "visualHint": scene.visual_hint,
                    "useExpertPhoto": scene.use_expert_photo,
                })
            })
            .collect();

        json!({
            "templateId": self.template_id,
            "inputs": {
                "script": self.script,
                "caption": self.caption,
                "scenes": scenes,
                "style": self.style,
            },
            "render": true,
        })
    }
}
