//! Japanese prefecture table, address matching, and representative
//! coordinates.

use crate::domain::GeoPoint;

/// A prefecture in JIS X 0401 order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prefecture {
    /// Two-digit JIS code, `01` (北海道) to `47` (沖縄県).
    pub code: &'static str,
    pub name: &'static str,
    /// Representative point, usually the prefectural capital.
    pub latitude: f64,
    pub longitude: f64,
}

impl Prefecture {
    /// Representative coordinates as a [`GeoPoint`].
    pub fn coordinates(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.latitude, self.longitude)
    }
}

macro_rules! prefectures {
    ($($code:literal $name:literal $lat:literal $lon:literal),* $(,)?) => {
        [$(Prefecture { code: $code, name: $name, latitude: $lat, longitude: $lon }),*]
    };
}

/// All 47 prefectures in JIS order.
pub static PREFECTURES: [Prefecture; 47] = prefectures![
    "01" "北海道" 43.0642 141.3469,
    "02" "青森県" 40.8245 140.7361,
    "03" "岩手県" 39.6917 141.1532,
    "04" "宮城県" 38.2688 140.8721,
    "05" "秋田県" 39.7199 140.1088,
    "06" "山形県" 38.2405 140.3633,
    "07" "福島県" 37.7503 140.4680,
    "08" "茨城県" 36.3426 140.4470,
    "09" "栃木県" 36.5653 139.8835,
    "10" "群馬県" 36.7394 139.0577,
    "11" "埼玉県" 35.8617 139.6455,
    "12" "千葉県" 35.6050 140.1233,
    "13" "東京都" 35.6762 139.6503,
    "14" "神奈川県" 35.4437 139.6380,
    "15" "新潟県" 37.9026 139.0328,
    "16" "富山県" 36.6955 137.2113,
    "17" "石川県" 36.5944 136.6256,
    "18" "福井県" 36.0641 135.7348,
    "19" "山梨県" 35.6640 138.5674,
    "20" "長野県" 36.7516 138.2529,
    "21" "岐阜県" 35.3911 136.7261,
    "22" "静岡県" 34.9949 138.3830,
    "23" "愛知県" 35.1802 136.9066,
    "24" "三重県" 34.7306 136.5086,
    "25" "滋賀県" 35.0081 135.8677,
    "26" "京都府" 35.0116 135.7681,
    "27" "大阪府" 34.6937 135.5023,
    "28" "兵庫県" 34.7405 135.1955,
    "29" "奈良県" 34.3488 135.8048,
    "30" "和歌山県" 33.7298 135.5955,
    "31" "鳥取県" 35.5307 134.2344,
    "32" "島根県" 35.4730 132.5552,
    "33" "岡山県" 34.6619 133.9344,
    "34" "広島県" 34.3996 132.4596,
    "35" "山口県" 34.1858 131.4745,
    "36" "徳島県" 34.0656 134.6095,
    "37" "香川県" 34.3395 134.0432,
    "38" "愛媛県" 33.8417 132.7662,
    "39" "高知県" 33.5904 133.3331,
    "40" "福岡県" 33.5904 130.4017,
    "41" "佐賀県" 33.2490 130.2996,
    "42" "長崎県" 32.7503 129.8738,
    "43" "熊本県" 32.7897 130.7410,
    "44" "大分県" 33.2381 131.6126,
    "45" "宮崎県" 31.9111 131.4230,
    "46" "鹿児島県" 31.5628 130.5579,
    "47" "沖縄県" 26.2126 127.6809,
];

/// Look up a prefecture by its exact name.
pub fn find_prefecture(name: &str) -> Option<&'static Prefecture> {
    PREFECTURES.iter().find(|prefecture| prefecture.name == name)
}

/// Return the prefecture whose name prefixes the trimmed address.
///
/// # Examples
/// ```
/// use localconnect::domain::extract_prefecture_from_address;
///
/// let prefecture = extract_prefecture_from_address(" 東京都渋谷区神南1-2-3");
/// assert_eq!(prefecture.map(|p| p.name), Some("東京都"));
/// assert!(extract_prefecture_from_address("渋谷区神南").is_none());
/// ```
pub fn extract_prefecture_from_address(address: &str) -> Option<&'static Prefecture> {
    let address = address.trim();
    PREFECTURES
        .iter()
        .find(|prefecture| address.starts_with(prefecture.name))
}

/// Representative coordinates for a prefecture name.
pub fn prefecture_coordinates(name: &str) -> Option<GeoPoint> {
    find_prefecture(name).map(Prefecture::coordinates)
}

/// Representative coordinates for a city.
///
/// No city-level gazetteer is bundled, so this resolves to the prefecture's
/// point.
pub fn city_coordinates(prefecture: &str, _city: &str) -> Option<GeoPoint> {
    prefecture_coordinates(prefecture)
}
