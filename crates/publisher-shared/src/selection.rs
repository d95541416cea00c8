//! Normalization of bulk-delete input into a set of post ids.
//!
//! Clients send `postIds` either once (a single checked box, a scalar JSON
//! value) or many times (repeated form fields, a JSON array). Both shapes
//! become one [`DeleteSelection`] holding a deduplicated id set.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::dto::{DeletePostsRequest, RawPostId};

/// The `action` value that confirms a deletion.
pub const DELETE_ACTION: &str = "delete";

const POST_IDS_FIELD: &str = "postIds";
const POST_IDS_ARRAY_FIELD: &str = "postIds[]";
const ACTION_FIELD: &str = "action";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid post id: {0:?}")]
pub struct InvalidPostId(pub String);

/// What a delete request asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteSelection {
    confirmed: bool,
    ids: BTreeSet<i32>,
}

impl DeleteSelection {
    /// Normalize a JSON delete request.
    ///
    /// Ids are only parsed when the action is `delete`; otherwise the
    /// selection is empty and unconfirmed.
    pub fn from_request(request: DeletePostsRequest) -> Result<Self, InvalidPostId> {
        if request.action.as_deref() != Some(DELETE_ACTION) {
            return Ok(Self::default());
        }

        let ids = request
            .post_ids
            .map(|ids| ids.into_vec())
            .unwrap_or_default()
            .into_iter()
            .map(parse_raw_id)
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            confirmed: true,
            ids,
        })
    }

    /// Normalize urlencoded form fields, where `postIds` may repeat.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Result<Self, InvalidPostId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut action = None;
        let mut raw_ids = Vec::new();

        for (key, value) in pairs {
            match key.as_ref() {
                ACTION_FIELD => action = Some(value.as_ref().to_string()),
                POST_IDS_FIELD | POST_IDS_ARRAY_FIELD => raw_ids.push(value.as_ref().to_string()),
                _ => {}
            }
        }

        if action.as_deref() != Some(DELETE_ACTION) {
            return Ok(Self::default());
        }

        let ids = raw_ids
            .iter()
            .map(|raw| parse_text_id(raw))
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            confirmed: true,
            ids,
        })
    }

    /// Whether anything should be deleted.
    pub fn is_actionable(&self) -> bool {
        self.confirmed && !self.ids.is_empty()
    }

    pub fn ids(&self) -> &BTreeSet<i32> {
        &self.ids
    }
}

fn parse_raw_id(raw: RawPostId) -> Result<i32, InvalidPostId> {
    match raw {
        RawPostId::Number(n) => i32::try_from(n).map_err(|_| InvalidPostId(n.to_string())),
        RawPostId::Text(text) => parse_text_id(&text),
    }
}

fn parse_text_id(raw: &str) -> Result<i32, InvalidPostId> {
    raw.trim()
        .parse()
        .map_err(|_| InvalidPostId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::OneOrMany;

    fn json_request(body: &str) -> DeletePostsRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_scalar_id_becomes_single_element_set() {
        let selection =
            DeleteSelection::from_request(json_request(r#"{"action":"delete","postIds":"4"}"#))
                .unwrap();
        assert_eq!(selection.ids(), &BTreeSet::from([4]));
        assert!(selection.is_actionable());

        let selection =
            DeleteSelection::from_request(json_request(r#"{"action":"delete","postIds":4}"#))
                .unwrap();
        assert_eq!(selection.ids(), &BTreeSet::from([4]));
    }

    #[test]
    fn test_list_is_deduplicated() {
        let selection = DeleteSelection::from_request(json_request(
            r#"{"action":"delete","postIds":[3,"1",3," 2 "]}"#,
        ))
        .unwrap();
        assert_eq!(selection.ids(), &BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn test_missing_action_is_not_actionable() {
        let selection = DeleteSelection::from_request(DeletePostsRequest {
            action: None,
            post_ids: Some(OneOrMany::One(RawPostId::Number(1))),
        })
        .unwrap();
        assert!(!selection.is_actionable());
        assert!(selection.ids().is_empty());
    }

    #[test]
    fn test_other_action_ignores_bad_ids() {
        let selection =
            DeleteSelection::from_request(json_request(r#"{"action":"archive","postIds":"x"}"#))
                .unwrap();
        assert!(!selection.is_actionable());
    }

    #[test]
    fn test_confirmed_without_ids_is_not_actionable() {
        let selection =
            DeleteSelection::from_request(json_request(r#"{"action":"delete"}"#)).unwrap();
        assert!(!selection.is_actionable());
    }

    #[test]
    fn test_out_of_range_number_is_rejected() {
        let err = DeleteSelection::from_request(json_request(
            r#"{"action":"delete","postIds":[4294967296]}"#,
        ))
        .unwrap_err();
        assert_eq!(err, InvalidPostId("4294967296".to_string()));
    }

    #[test]
    fn test_form_pairs_collect_repeated_ids() {
        let pairs = vec![
            ("postIds", "5"),
            ("postIds", "7"),
            ("postIds[]", "9"),
            ("action", "delete"),
        ];
        let selection = DeleteSelection::from_form_pairs(pairs).unwrap();
        assert_eq!(selection.ids(), &BTreeSet::from([5, 7, 9]));
        assert!(selection.is_actionable());
    }

    #[test]
    fn test_form_single_id() {
        let selection =
            DeleteSelection::from_form_pairs([("action", "delete"), ("postIds", "12")]).unwrap();
        assert_eq!(selection.ids(), &BTreeSet::from([12]));
    }

    #[test]
    fn test_form_rejects_non_numeric_id() {
        let err = DeleteSelection::from_form_pairs([("action", "delete"), ("postIds", "abc")])
            .unwrap_err();
        assert_eq!(err.0, "abc");
    }
}
