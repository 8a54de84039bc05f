use super::*;

fn snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        weather_id: 500,
        high_temp: 18,
        low_temp: 9,
        short_description: "Light rain".to_string(),
        icon_asset: Some(AssetRef::new("asset://rain")),
    }
}

#[test]
fn typed_getters_reject_other_variants() {
    let map = DataMap::new()
        .with_int("max-temp", 21)
        .with_text("short-description", "Sunny")
        .with_asset("icon-asset", AssetRef::new("a1"));

    assert_eq!(map.get_int("max-temp"), Some(21));
    assert_eq!(map.get_text("max-temp"), None);
    assert_eq!(map.get_text("short-description"), Some("Sunny"));
    assert_eq!(map.get_asset("icon-asset"), Some(&AssetRef::new("a1")));
    assert_eq!(map.get_int("icon-asset"), None);
    assert!(map.get("nope").is_none());
}

#[test]
fn data_event_json_shape() {
    let ev = DataEvent::changed("/weather-update", DataMap::new().with_int("weather-id", 800));
    let json = serde_json::to_value(&ev).unwrap();
    assert_eq!(json["kind"], "changed");
    assert_eq!(json["data"]["weather-id"]["type"], "int");
    assert_eq!(json["data"]["weather-id"]["value"], 800);
}

#[test]
fn handoff_json_keeps_all_fields() {
    let update = WeatherUpdate::encoded(snapshot(), vec![1, 2, 3]);
    let handoff = update.to_handoff().unwrap();
    let back = WeatherHandoff::from_json(&handoff.to_json().unwrap()).unwrap();
    assert_eq!(back, handoff);

    let (snap, bytes) = back.into_parts();
    assert_eq!(snap.high_temp, 18);
    assert_eq!(snap.low_temp, 9);
    assert_eq!(snap.short_description, "Light rain");
    assert_eq!(snap.icon_asset, None);
    assert_eq!(bytes, vec![1, 2, 3]);
}

#[test]
fn handoff_without_weather_id_defaults_to_zero() {
    let h = WeatherHandoff::from_json(
        r#"{"max_temp":1,"min_temp":0,"short_desc":"x","weather_image":[137]}"#,
    )
    .unwrap();
    assert_eq!(h.weather_id, 0);
}

#[test]
fn decoded_icon_is_png_encoded_for_handoff() {
    let bmp = Bitmap::filled(2, 2, [9, 9, 9, 255]);
    let handoff = WeatherUpdate::decoded(snapshot(), bmp.clone())
        .to_handoff()
        .unwrap();
    let back = crate::assets::decode::decode_icon(Some(&handoff.weather_image)).unwrap();
    assert_eq!(back, bmp);
}

#[test]
fn epoch_is_unset_until_stamped() {
    let u = WeatherUpdate::encoded(snapshot(), vec![]);
    assert_eq!(u.epoch(), None);
    assert_eq!(u.with_epoch(3).epoch(), Some(3));
}
