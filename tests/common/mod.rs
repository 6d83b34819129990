#![allow(dead_code)]

use httpmock::MockServer;
use interview_admin::{AdminClient, AppState};
use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

/// Stores pointed at the mock server, with a session token already in place.
pub fn logged_in_state(server: &MockServer) -> AppState {
    let state = AppState::new(AdminClient::new(&server.base_url()));
    state.client.session().set_token(TOKEN);
    state
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}

pub fn package_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "packageName": name,
        "questions": [
            {
                "questionText": format!("{name} question"),
                "question_time": { "hours": 0, "minutes": 2, "seconds": 0 }
            }
        ]
    })
}

pub fn interview_json(id: &str, title: &str, expire_date: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "packages": ["p1"],
        "expireDate": expire_date,
        "canSkip": false,
        "showAtOnce": true,
        "totalVideos": 0,
        "onHold": 0
    })
}

pub fn form_json(id: &str, first_name: &str, video_id: Option<&str>) -> Value {
    json!({
        "_id": id,
        "firstName": first_name,
        "lastName": "Candidate",
        "videoId": video_id,
        "status": null,
        "notes": "",
        "alert": false
    })
}
