use regcensus_api::{Client, Query, ValuesQuery};
use url::Url;

fn base_url() -> Url {
    Url::parse("https://example.com/state-summary").unwrap()
}

#[test]
fn values_query_parameter_order() {
    let url = ValuesQuery::default()
        .with_page(2)
        .with_year("2019")
        .with_series(&[1])
        .with_jurisdictions(&[38])
        .with_document_type(1)
        .with_label_level(3)
        .add_to_url(&base_url());
    let query = url.query().unwrap();
    let keys: Vec<&str> = query
        .split('&')
        .map(|pair| pair.split('=').next().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec!["series", "jurisdiction", "labelLevel", "year", "documenttype", "page"]
    );
}

#[test]
fn values_query_lists_are_comma_joined() {
    let url = ValuesQuery::default()
        .with_series(&[1, 2])
        .with_jurisdictions(&[58, 59])
        .add_to_url(&base_url());
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs[0], ("series".to_string(), "1,2".to_string()));
    assert_eq!(pairs[1], ("jurisdiction".to_string(), "58,59".to_string()));
}

#[test]
fn values_query_range_expansion() {
    let url = ValuesQuery::default()
        .with_series(&[2])
        .with_jurisdictions(&[20])
        .with_years(&["2015".to_string(), "2021".to_string()])
        .with_year_range(true)
        .add_to_url(&base_url());
    let year = url
        .query_pairs()
        .find(|(k, _)| k == "year")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(year, "2015,2016,2017,2018,2019,2020,2021");
}

#[test]
fn values_query_two_points_without_range() {
    let url = ValuesQuery::default()
        .with_years(&["2015".to_string(), "2021".to_string()])
        .add_to_url(&base_url());
    assert!(url.query().unwrap().contains("year=2015,2021"));
}

#[test]
fn spaces_in_keywords_are_encoded() {
    let client = Client::with_base_url("https://example.com/");
    let url = client
        .url_for(
            "/agencies-keyword",
            Some(&regcensus_api::AgencyQuery::Keyword("Fish and Wildlife".to_string())),
        )
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.com/agencies-keyword?keyword=Fish%20and%20Wildlife"
    );
}
