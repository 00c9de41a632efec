use proptest::prelude::*;
use tce_record::{
    tces_from_catalog, CatalogEntry, CatalogLookup, EpochOffset, Field, Quantity, StandardUnits,
    Tce, TceError, TceResult, Unit, UnitSystem, BKJD, BTJD, MJD,
};

fn example_tce() -> Tce {
    Tce::new(
        Quantity::days(5.3),
        Quantity::days(133.4),
        EpochOffset::days(-2_454_833.0),
        Quantity::fraction(1e-6),
        Quantity::hours(24.0),
    )
    .with_comment("example")
}

#[test]
fn example_record_validates_and_roundtrips_keeping_hours() {
    let tce = example_tce();
    assert!(tce.validate());

    let text = tce.to_serial_form();
    assert!(text.contains(r#""duration":24.0,"duration_unit":"h""#));
    assert!(text.contains(r#""comment":"example""#));

    let back = Tce::from_serial_form(&text).unwrap();
    assert_eq!(back, tce);
    assert_eq!(back.duration().unwrap().unit(), Unit::Hour);
    assert_eq!(back.duration().unwrap().value(), 24.0);
    assert_eq!(back.to_serial_form(), text);
}

#[test]
fn persisted_example_document_loads() {
    let text = r#"{"period": 5.3, "period_unit": "d", "epoch": 133.4, "epoch_unit": "d", "epoch_offset": -2454833.0, "epoch_offset_unit": "d", "depth": 1e-06, "depth_unit": "", "duration": 24.0, "duration_unit": "h"}"#;
    let tce = Tce::from_serial_form(text).unwrap();
    assert!(tce.validate());
    assert_eq!(tce.epoch_offset().unwrap().label(), Some("bkjd"));
    let mut expected = example_tce();
    expected.set_comment(None);
    assert_eq!(tce, expected);
}

#[test]
fn missing_epoch_offset_is_incomplete_but_serialisable() {
    let mut tce = example_tce();
    tce.set_epoch_offset(None);
    assert!(!tce.validate());

    let text = tce.to_serial_form();
    assert!(!text.contains("epoch_offset"));
    let back = Tce::from_serial_form(&text).unwrap();
    assert!(!back.validate());
    assert_eq!(back, tce);
}

#[test]
fn unit_independence() {
    let days = example_tce();
    let hours = example_tce().with_period(Quantity::hours(127.2));
    assert_eq!(days, hours);
    assert_ne!(days.to_serial_form(), hours.to_serial_form());
    assert!(hours.to_serial_form().contains(r#""period":127.2,"period_unit":"h""#));
}

#[test]
fn epoch_offset_distinctness() {
    let bkjd = example_tce();
    let btjd = example_tce().with_epoch(Quantity::days(133.4), EpochOffset::of::<BTJD>());
    assert_ne!(bkjd, btjd);
}

#[test]
fn cross_system_epochs_compare_explicitly() {
    let bkjd = example_tce();
    let mjd_epoch = bkjd.epoch_in(EpochOffset::of::<MJD>()).unwrap();
    let mjd = example_tce().with_epoch(mjd_epoch, EpochOffset::of::<MJD>());
    assert_ne!(bkjd, mjd);
    assert!(bkjd.same_transit_epoch(&mjd));
}

#[test]
fn malformed_inputs_are_rejected() {
    let orphan = Tce::from_serial_form(r#"{"foo_unit":"d"}"#).unwrap_err();
    assert!(matches!(orphan, TceError::MalformedRecord { .. }));

    let not_a_number =
        Tce::from_serial_form(r#"{"depth":"deep","depth_unit":"ppm"}"#).unwrap_err();
    assert!(matches!(not_a_number, TceError::MalformedRecord { .. }));

    let snr = Tce::from_serial_form(r#"{"snr":"high"}"#).unwrap_err();
    assert!(snr.is_malformed());

    let nested =
        Tce::from_serial_form(r#"{"period":5.3,"period_unit":"d","period_unit_unit":"h"}"#)
            .unwrap_err();
    assert!(matches!(nested, TceError::MalformedRecord { .. }));

    let truncated = Tce::from_serial_form(&example_tce().to_serial_form()[..40]).unwrap_err();
    assert!(matches!(truncated, TceError::MalformedRecord { .. }));
}

#[test]
fn extensions_roundtrip_in_insertion_order() {
    let tce = example_tce()
        .with_snr(11.4)
        .with_event_name("K00010.01")
        .with_target_name("Kepler-10")
        .with_extension("rp_rs", Quantity::fraction(0.0123))
        .unwrap()
        .with_extension("odd_even_sigma", 1.7)
        .unwrap()
        .with_extension("disposition", "PC")
        .unwrap();

    let text = tce.to_serial_form();
    let rp = text.find("rp_rs").unwrap();
    let odd = text.find("odd_even_sigma").unwrap();
    let disposition = text.find("disposition").unwrap();
    assert!(rp < odd && odd < disposition);

    let back = Tce::from_serial_form(&text).unwrap();
    assert_eq!(back, tce);
    assert_eq!(back.extension("disposition"), Some(&Field::Text("PC".into())));
}

#[test]
fn non_finite_plain_extension_never_enters_a_record() {
    let err = example_tce().with_extension("odd_even_sigma", f64::NAN).unwrap_err();
    assert!(matches!(err, TceError::NonFiniteExtension { .. }));

    let mut tce = example_tce();
    assert!(tce.insert_extension("odd_even_sigma", f64::INFINITY).is_err());
    let back = Tce::from_serial_form(&tce.to_serial_form()).unwrap();
    assert_eq!(back, tce);
}

/// Unit system that only knows days and refuses every named offset.
struct DaysOnly;

impl UnitSystem for DaysOnly {
    fn parse_unit(&self, symbol: &str) -> TceResult<Unit> {
        match symbol {
            "d" => Ok(Unit::Day),
            _ => Err(TceError::UnknownUnit {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn named_offset(&self, label: &str) -> TceResult<EpochOffset> {
        Err(TceError::UnknownTimeSystem {
            label: label.to_string(),
        })
    }
}

#[test]
fn unit_system_is_injected() {
    let text = example_tce().to_serial_form();
    let err = Tce::from_serial_form_with(&text, &DaysOnly).unwrap_err();
    assert!(matches!(err, TceError::UnknownUnit { .. }));

    let days_only = r#"{"period":5.3,"period_unit":"d"}"#;
    let tce = Tce::from_serial_form_with(days_only, &DaysOnly).unwrap();
    assert_eq!(tce.period(), Some(Quantity::days(5.3)));
}

/// Unit system that spells hours `hr` on the way out.
struct LongHours;

impl UnitSystem for LongHours {
    fn parse_unit(&self, symbol: &str) -> TceResult<Unit> {
        StandardUnits.parse_unit(symbol)
    }

    fn symbol(&self, unit: Unit) -> &'static str {
        match unit {
            Unit::Hour => "hr",
            other => other.symbol(),
        }
    }

    fn named_offset(&self, label: &str) -> TceResult<EpochOffset> {
        StandardUnits.named_offset(label)
    }
}

#[test]
fn unit_system_chooses_written_symbols() {
    let tce = example_tce();
    let text = tce.to_serial_form_with(&LongHours);
    assert!(text.contains(r#""duration":24.0,"duration_unit":"hr""#));
    assert!(text.contains(r#""period_unit":"d""#));
    assert_ne!(text, tce.to_serial_form());

    let back = Tce::from_serial_form_with(&text, &LongHours).unwrap();
    assert_eq!(back, tce);
    assert_eq!(back.duration().unwrap().unit(), Unit::Hour);
}

struct FakeArchive;

#[derive(Debug)]
enum ArchiveError {
    Record(TceError),
}

impl From<TceError> for ArchiveError {
    fn from(err: TceError) -> Self {
        ArchiveError::Record(err)
    }
}

impl CatalogLookup for FakeArchive {
    type Error = ArchiveError;

    fn lookup(&self, name: &str) -> Result<Vec<CatalogEntry>, ArchiveError> {
        if name != "Kepler-10" {
            return Ok(Vec::new());
        }
        Ok(vec![
            CatalogEntry {
                catalog_name: "koi".into(),
                name: Some("K00072.01".into()),
                period_days: 0.837_495,
                epoch_days: 131.574,
                time_system: "bkjd".into(),
                depth: 1.5e-4,
                duration_days: 0.07,
                snr: None,
            },
            CatalogEntry {
                catalog_name: "confirmed".into(),
                name: None,
                period_days: 45.29,
                epoch_days: 2_454_971.6,
                time_system: "bjd".into(),
                depth: 4.0e-4,
                duration_days: 0.28,
                snr: None,
            },
        ])
    }
}

#[test]
fn catalog_rows_become_records() {
    let tces = tces_from_catalog(&FakeArchive, "Kepler-10", &StandardUnits).unwrap();
    assert_eq!(tces.len(), 2);
    assert!(tces.iter().all(Tce::validate));
    assert_eq!(tces[0].epoch_offset(), Some(EpochOffset::of::<BKJD>()));
    assert_eq!(tces[1].epoch_offset(), Some(EpochOffset::ZERO));
    assert_eq!(tces[0].target_name(), Some("Kepler-10"));
}

#[test]
fn empty_catalog_answer_yields_no_records() {
    let tces = tces_from_catalog(&FakeArchive, "nobody", &StandardUnits).unwrap();
    assert!(tces.is_empty());
}

#[test]
fn catalog_with_unknown_time_system_fails() {
    let result = tces_from_catalog(&FakeArchive, "Kepler-10", &DaysOnly);
    assert!(matches!(
        result,
        Err(ArchiveError::Record(TceError::UnknownTimeSystem { .. }))
    ));
}

fn any_unit() -> impl Strategy<Value = Unit> {
    prop::sample::select(Unit::ALL.to_vec())
}

fn any_quantity() -> impl Strategy<Value = Quantity> {
    (-1e9_f64..1e9_f64, any_unit()).prop_map(|(v, u)| Quantity::new(v, u))
}

fn any_field() -> impl Strategy<Value = Field> {
    prop_oneof![
        any_quantity().prop_map(Field::Quantity),
        (-1e12_f64..1e12_f64).prop_map(Field::Number),
        "[a-zA-Z0-9 .,_-]{0,16}".prop_map(Field::Text),
    ]
}

prop_compose! {
    fn any_tce()(
        period in prop::option::of(any_quantity()),
        epoch in prop::option::of(any_quantity()),
        offset in prop::option::of(any_quantity()),
        depth in prop::option::of(any_quantity()),
        duration in prop::option::of(any_quantity()),
        snr in prop::option::of(-1e3_f64..1e3_f64),
        event_name in prop::option::of("[ -~]{0,24}"),
        target_name in prop::option::of("[ -~]{0,24}"),
        comment in prop::option::of("[ -~]{0,24}"),
        extensions in prop::collection::vec(("ext[a-z]{1,6}", any_field()), 0..4),
    ) -> Tce {
        let mut tce = Tce::empty();
        tce.set_period(period);
        tce.set_epoch(epoch);
        tce.set_epoch_offset(offset.map(EpochOffset::from_quantity));
        tce.set_depth(depth);
        tce.set_duration(duration);
        tce.set_snr(snr);
        tce.set_event_name(event_name);
        tce.set_target_name(target_name);
        tce.set_comment(comment);
        for (name, field) in extensions {
            tce.insert_extension(&name, field).unwrap();
        }
        tce
    }
}

proptest! {
    #[test]
    fn serial_form_roundtrips(tce in any_tce()) {
        let text = tce.to_serial_form();
        let back = Tce::from_serial_form(&text).unwrap();
        prop_assert_eq!(&back, &tce);
        prop_assert_eq!(back.to_serial_form(), text);
    }

    #[test]
    fn validate_never_panics(tce in any_tce()) {
        let complete = tce.validate();
        prop_assert_eq!(complete, tce.missing_fields().is_empty());
    }
}
