//! Static lookup tables for Level 3 product codes and radar sites.

/// Descriptive information about a Level 3 product code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductInfo {
    pub code: i16,
    /// Short mnemonic used in product listings (e.g. "DR", "DCC").
    pub mnemonic: &'static str,
    pub name: &'static str,
    /// Suffix of the NWS distribution file name (`DS.<suffix>`), where one is
    /// published.
    pub ds_code: Option<&'static str>,
}

const PRODUCTS: &[ProductInfo] = &[
    product(2, "GSM", "General Status Message", None),
    product(19, "R", "Base Reflectivity", None),
    product(27, "V", "Base Velocity", None),
    product(37, "CR", "Composite Reflectivity", None),
    product(56, "SRM", "Storm Relative Mean Radial Velocity", None),
    product(78, "OHP", "One-Hour Precipitation", None),
    product(80, "STP", "Storm Total Precipitation", None),
    product(81, "DPA", "Digital Precipitation Array", None),
    product(94, "DR", "Digital Base Reflectivity", Some("p94r0")),
    product(99, "DV", "Digital Base Velocity", Some("p99v0")),
    product(134, "DVL", "Digital Vertically Integrated Liquid", Some("134il")),
    product(135, "EET", "Enhanced Echo Tops", None),
    product(153, "SDR", "Super Resolution Digital Base Reflectivity", None),
    product(154, "SDV", "Super Resolution Digital Base Velocity", None),
    product(155, "SDW", "Super Resolution Digital Spectrum Width", None),
    product(159, "DZD", "Digital Differential Reflectivity", Some("159x0")),
    product(161, "DCC", "Digital Correlation Coefficient", Some("161c0")),
    product(163, "DKD", "Digital Specific Differential Phase", Some("163k0")),
    product(165, "DHC", "Digital Hydrometeor Classification", Some("165h0")),
    product(166, "ML", "Melting Layer", None),
    product(169, "OHA", "One-Hour Accumulation", None),
    product(170, "DAA", "Digital Accumulation Array", None),
    product(171, "STA", "Storm Total Accumulation", None),
    product(172, "DTA", "Digital Storm Total Accumulation", Some("172dt")),
    product(173, "DUA", "Digital User-Selectable Accumulation", None),
    product(174, "DOD", "Digital One-Hour Difference Accumulation", None),
    product(175, "DSD", "Digital Storm Total Difference Accumulation", None),
    product(176, "DPR", "Digital Instantaneous Precipitation Rate", Some("176pr")),
    product(177, "HHC", "Hybrid Hydrometeor Classification", None),
];

const fn product(
    code: i16,
    mnemonic: &'static str,
    name: &'static str,
    ds_code: Option<&'static str>,
) -> ProductInfo {
    ProductInfo {
        code,
        mnemonic,
        name,
        ds_code,
    }
}

/// Full table entry for `code`.
pub fn product_info(code: i16) -> Option<&'static ProductInfo> {
    PRODUCTS.iter().find(|p| p.code == code)
}

/// Human readable product name.
pub fn product_name(code: i16) -> Option<&'static str> {
    product_info(code).map(|p| p.name)
}

/// Short product mnemonic.
pub fn product_string_code(code: i16) -> Option<&'static str> {
    product_info(code).map(|p| p.mnemonic)
}

/// Distribution file suffix, e.g. `p94r0` for `DS.p94r0`.
pub fn product_ds_code(code: i16) -> Option<&'static str> {
    product_info(code).and_then(|p| p.ds_code)
}

/// Reverse lookup from a distribution file suffix.
pub fn product_code_for_ds(ds_code: &str) -> Option<i16> {
    let ds_code = ds_code.strip_prefix("DS.").unwrap_or(ds_code);
    PRODUCTS
        .iter()
        .find(|p| p.ds_code.is_some_and(|ds| ds.eq_ignore_ascii_case(ds_code)))
        .map(|p| p.code)
}

/// Location of a WSR-88D site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteLocation {
    pub icao: &'static str,
    pub latitude: f32,
    pub longitude: f32,
    /// Meters above sea level.
    pub elevation: i16,
}

const SITES: &[SiteLocation] = &[
    site("KAMX", 25.611, -80.413, 4),
    site("KATX", 48.195, -122.496, 151),
    site("KBOX", 41.956, -71.137, 36),
    site("KDIX", 39.947, -74.411, 45),
    site("KDTX", 42.700, -83.472, 327),
    site("KEAX", 38.810, -94.264, 303),
    site("KFTG", 39.787, -104.546, 1675),
    site("KFWS", 32.573, -97.303, 208),
    site("KHGX", 29.472, -95.079, 5),
    site("KIND", 39.708, -86.280, 241),
    site("KIWA", 33.289, -111.670, 412),
    site("KLIX", 30.337, -89.826, 7),
    site("KLOT", 41.604, -88.085, 202),
    site("KMPX", 44.849, -93.566, 288),
    site("KMUX", 37.155, -121.898, 1057),
    site("KOKX", 40.866, -72.864, 26),
    site("KSGF", 37.235, -93.400, 390),
    site("KTLX", 35.333, -97.278, 370),
];

const fn site(icao: &'static str, latitude: f32, longitude: f32, elevation: i16) -> SiteLocation {
    SiteLocation {
        icao,
        latitude,
        longitude,
        elevation,
    }
}

/// Look up a site by ICAO identifier (case-insensitive).
pub fn site_location(icao: &str) -> Option<&'static SiteLocation> {
    SITES.iter().find(|s| s.icao.eq_ignore_ascii_case(icao))
}

/// Closest known site to a decoded header position, within `tolerance_deg`
/// on both axes.
pub fn site_near(latitude: f32, longitude: f32, tolerance_deg: f32) -> Option<&'static SiteLocation> {
    SITES
        .iter()
        .filter(|s| {
            (s.latitude - latitude).abs() <= tolerance_deg
                && (s.longitude - longitude).abs() <= tolerance_deg
        })
        .min_by(|a, b| {
            let da = (a.latitude - latitude).powi(2) + (a.longitude - longitude).powi(2);
            let db = (b.latitude - latitude).powi(2) + (b.longitude - longitude).powi(2);
            da.total_cmp(&db)
        })
}
