use proptest::prelude::*;
use serde_json::json;
use wine_radar::{
    model::{AnalysisResult, Dimension, ScoreVector, WineType},
    scoring::reply::{parse_reply, ReplyError},
};

fn reply_json(wine_type: &str, scores: &ScoreVector) -> String {
    json!({ "wine_type": wine_type, "scores": scores }).to_string()
}

proptest! {
    #[test]
    fn score_vectors_survive_plain_and_fenced_replies(values in proptest::array::uniform11(0i64..=10)) {
        let scores = ScoreVector::from_values(values).unwrap();
        let plain = reply_json("Orange", &scores);
        let fenced = format!("```json\n{plain}\n```");

        let from_plain = parse_reply(&plain).unwrap();
        let from_fenced = parse_reply(&fenced).unwrap();
        prop_assert_eq!(&from_plain, &from_fenced);
        prop_assert_eq!(from_plain.scores, scores);
        prop_assert_eq!(from_plain.wine_type, WineType::Orange);
    }
}

#[test]
fn fenced_orange_reply_matches_unfenced() {
    let body = r#"{"wine_type":"Orange","scores":{"Quality":7,"Acidity":8,"Tannins":4,"Body":5,"Fruitiness":5,"Finish":7,"Complexity":8,"Funky":7,"Brett":3,"Alcohol":5,"Sweetness":1}}"#;
    let fenced = format!("```json\n{body}\n```");
    assert_eq!(parse_reply(&fenced).unwrap(), parse_reply(body).unwrap());
}

#[test]
fn scores_serialise_with_dimension_names() {
    let scores = ScoreVector::from_values([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 0]).unwrap();
    let value = serde_json::to_value(scores).unwrap();
    for (dimension, score) in scores.iter() {
        assert_eq!(value[dimension.name()], json!(score));
    }
    assert_eq!(value.as_object().unwrap().len(), Dimension::ALL.len());
}

#[test]
fn missing_dimension_is_rejected() {
    let reply = r#"{"wine_type":"Red","scores":{"Quality":8,"Acidity":7,"Tannins":6,"Body":5,"Fruitiness":7,"Finish":8,"Complexity":7,"Funky":6,"Brett":8,"Alcohol":5}}"#;
    let err = parse_reply(reply).unwrap_err();
    assert!(matches!(err, ReplyError::Json(_)));
    assert!(err.to_string().contains("Sweetness"));
}

#[test]
fn out_of_range_score_is_rejected() {
    let reply = r#"{"wine_type":"Red","scores":{"Quality":11,"Acidity":7,"Tannins":6,"Body":5,"Fruitiness":7,"Finish":8,"Complexity":7,"Funky":6,"Brett":8,"Alcohol":5,"Sweetness":1}}"#;
    assert!(parse_reply(reply).is_err());
}

#[test]
fn missing_or_odd_wine_type_is_not_an_error() {
    let scores = r#"{"Quality":8,"Acidity":7,"Tannins":6,"Body":5,"Fruitiness":7,"Finish":8,"Complexity":7,"Funky":6,"Brett":8,"Alcohol":5,"Sweetness":1}"#;
    let without: AnalysisResult = parse_reply(&format!(r#"{{"scores":{scores}}}"#)).unwrap();
    assert!(!without.wine_type.is_known());

    let rose = parse_reply(&format!(r#"{{"wine_type":"Rosé","scores":{scores}}}"#)).unwrap();
    assert_eq!(rose.wine_type, WineType::Rose);

    let sparkling = parse_reply(&format!(r#"{{"wine_type":"Sparkling","scores":{scores}}}"#)).unwrap();
    assert_eq!(sparkling.wine_type, WineType::Other("Sparkling".into()));
}

#[test]
fn prose_reply_is_a_parse_error() {
    assert!(matches!(
        parse_reply("Sorry, I cannot score this wine."),
        Err(ReplyError::Json(_))
    ));
}
