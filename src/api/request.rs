//! API request types
//!
//! Every request is one JSON object whose `op` field names the operation;
//! the remaining fields are the operation's payload, inline.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{
    Breed, Cage, Disease, Expense, FeedLog, FeedType, NewBreeding, NewCull, NewDeath,
    NewHealthRecord, NewLitter, NewRabbit, NewSale, NewSchedule, Rabbit, RecordId, StatusKind,
    Weight,
};
use crate::reporting::Period;

use super::errors::{ApiError, ApiResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    CreateRabbit(NewRabbit),
    UpdateRabbit(Rabbit),
    GetRabbit {
        id: RecordId,
    },
    ListRabbits {
        #[serde(default)]
        status: Option<StatusKind>,
    },

    CreateBreeding(NewBreeding),
    MarkBreedingFailed {
        breeding_id: RecordId,
    },
    CreateLitter(NewLitter),

    CreateSale(NewSale),
    CreateCull(NewCull),
    CreateDeath(NewDeath),

    CreateHealthRecord(NewHealthRecord),
    CreateSchedule(NewSchedule),
    CompleteSchedule {
        schedule_id: RecordId,
    },

    CreateBreed(Breed),
    UpdateBreed(Breed),
    CreateCage(Cage),
    UpdateCage(Cage),
    CreateDisease(Disease),
    UpdateDisease(Disease),
    CreateFeedType(FeedType),
    UpdateFeedType(FeedType),
    CreateFeedLog(FeedLog),
    UpdateFeedLog(FeedLog),
    CreateWeight(Weight),
    UpdateWeight(Weight),
    CreateExpense(Expense),
    UpdateExpense(Expense),

    PopulationStats,
    BreedingSuccess,
    TotalIncome(Period),
    TotalExpenses(Period),
    FeedConsumption,
    SickCount,
    AverageWeightByBreed {
        breed_id: RecordId,
    },
}

impl Request {
    /// Every accepted `op` value.
    pub const OPERATIONS: &'static [&'static str] = &[
        "create_rabbit",
        "update_rabbit",
        "get_rabbit",
        "list_rabbits",
        "create_breeding",
        "mark_breeding_failed",
        "create_litter",
        "create_sale",
        "create_cull",
        "create_death",
        "create_health_record",
        "create_schedule",
        "complete_schedule",
        "create_breed",
        "update_breed",
        "create_cage",
        "update_cage",
        "create_disease",
        "update_disease",
        "create_feed_type",
        "update_feed_type",
        "create_feed_log",
        "update_feed_log",
        "create_weight",
        "update_weight",
        "create_expense",
        "update_expense",
        "population_stats",
        "breeding_success",
        "total_income",
        "total_expenses",
        "feed_consumption",
        "sick_count",
        "average_weight_by_breed",
    ];

    /// Parse a request from a JSON string.
    ///
    /// An `op` outside [`Request::OPERATIONS`] is reported as an unknown
    /// operation; anything else that fails to decode is an invalid request.
    pub fn parse(json: &str) -> ApiResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;

        let op = value
            .get("op")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::invalid_request("Missing op"))?;
        if !Self::OPERATIONS.contains(&op) {
            return Err(ApiError::unknown_operation(op));
        }

        serde_json::from_value(value).map_err(|e| ApiError::invalid_request(e.to_string()))
    }

    /// Whether the request changes stored state.
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Request::GetRabbit { .. }
                | Request::ListRabbits { .. }
                | Request::PopulationStats
                | Request::BreedingSuccess
                | Request::TotalIncome(_)
                | Request::TotalExpenses(_)
                | Request::FeedConsumption
                | Request::SickCount
                | Request::AverageWeightByBreed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_rabbit() {
        let json = r#"{
            "op": "create_rabbit",
            "tag_id": "R-001",
            "gender": "Female",
            "acquisition_type": "purchased"
        }"#;

        match Request::parse(json).unwrap() {
            Request::CreateRabbit(new) => assert_eq!(new.tag_id, "R-001"),
            other => panic!("Expected CreateRabbit, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_catalog_record_without_id() {
        let json = r#"{"op": "create_breed", "name": "Rex"}"#;
        match Request::parse(json).unwrap() {
            Request::CreateBreed(breed) => assert_eq!(breed.name, "Rex"),
            other => panic!("Expected CreateBreed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_without_payload() {
        let req = Request::parse(r#"{"op": "breeding_success"}"#).unwrap();
        assert!(matches!(req, Request::BreedingSuccess));
        assert!(!req.is_write());
    }

    #[test]
    fn test_parse_unknown_op() {
        let err = Request::parse(r#"{"op": "drop_herd"}"#).unwrap_err();
        assert_eq!(err.code(), "RABBITRY_UNKNOWN_OPERATION");
    }

    #[test]
    fn test_parse_missing_op() {
        let err = Request::parse(r#"{"tag_id": "R-001"}"#).unwrap_err();
        assert!(err.message().contains("Missing op"));
    }

    #[test]
    fn test_parse_missing_field() {
        let err = Request::parse(r#"{"op": "mark_breeding_failed"}"#).unwrap_err();
        assert_eq!(err.code(), "RABBITRY_INVALID_REQUEST");
    }

    #[test]
    fn test_every_listed_operation_is_recognized() {
        for op in Request::OPERATIONS {
            let err = Request::parse(&format!(r#"{{"op": "{}", "unused": 1}}"#, op));
            if let Err(e) = err {
                assert_ne!(e.code(), "RABBITRY_UNKNOWN_OPERATION", "{}", op);
            }
        }
    }
}
