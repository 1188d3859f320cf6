//! The static product catalog.

use crate::types::{Money, Product, ProductId};

/// Immutable list of sellable products
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The storefront's launch range
    #[must_use]
    pub fn shield_point() -> Self {
        Self::new(vec![
            product(
                "1",
                "Durex Invisible Ultra Thin",
                "Durex",
                155_000,
                "Sản phẩm mỏng nhất của Durex, cảm giác như không đeo gì.",
                "Siêu mỏng",
                "https://production-cdn.pharmacity.io/digital/1080x1080/plain/e-com/images/ecommerce/20241231034740-1-P09315_1.jpg",
                &["Siêu mỏng 0.04mm", "Truyền nhiệt nhanh", "Bôi trơn cao cấp"],
            ),
            product(
                "2",
                "Sagami Original 0.01",
                "Sagami",
                245_000,
                "Đỉnh cao công nghệ Nhật Bản, mỏng đến mức khó tin.",
                "Siêu mỏng",
                "https://down-vn.img.susercontent.com/file/vn-11134207-7r98o-lmy5nkjjuqqn82",
                &["Polyurethane 0.01mm", "Không mùi cao su", "Chịu lực cực tốt"],
            ),
            product(
                "3",
                "Durex Performa Longer",
                "Durex",
                185_000,
                "Chứa 5% Benzocain giúp kéo dài thời gian yêu, bền bỉ hơn.",
                "Kéo dài",
                "https://production-cdn.pharmacity.io/digital/828x828/plain/e-com/images/ecommerce/20241231034741-1-P00101_1.jpg",
                &["Chứa Benzocain", "Kiểm soát tốt hơn", "An toàn tuyệt đối"],
            ),
            product(
                "4",
                "Durex Pleasuremax Ribbed",
                "Durex",
                170_000,
                "Thiết kế gân và hạt nổi kích thích tối đa cho cả hai.",
                "Gân gai",
                "https://product.hstatic.net/200000713511/product/bao-cao-su-durex-pleasuremax-co-gan-gai-hop-3-cai_0d53f47cb2d04957b818b7d64d1f05b5_1024x1024.jpeg",
                &["Gân nổi", "Hạt massage", "Thiết kế ôm sát"],
            ),
            product(
                "5",
                "OK Strawberry Flavour",
                "OK",
                45_000,
                "Hương dâu ngọt ngào, tạo cảm giác mới lạ và thư giãn.",
                "Hương thơm",
                "https://dktmekong.org/wp-content/uploads/2025/02/OK-Strawberry-Pack-3.jpg",
                &["Hương dâu", "Màu hồng", "Giá tiết kiệm"],
            ),
            product(
                "6",
                "Durex Jeans Comfort",
                "Durex",
                120_000,
                "Thiết kế Easy-on dễ đeo, tạo sự thoải mái tối đa.",
                "Phổ thông",
                "https://trungsoncare.com/images/detailed/10/1_2c7h-o5.png",
                &["Dễ đeo", "Dẻo dai", "Tin cậy"],
            ),
            product(
                "7",
                "Okamoto 0.01 Zero One",
                "Okamoto",
                260_000,
                "Đối thủ xứng tầm của Sagami, mỏng tuyệt đối từ Nhật Bản.",
                "Siêu mỏng",
                "https://wafuu.com/cdn/shop/files/okamoto-condoms-okamoto-zero-one-001mm-3pcs-159197_540x.jpg",
                &["Cảm giác chạm", "Mềm mại", "Trong suốt"],
            ),
            product(
                "8",
                "Durex Kingtex Size Nhỏ",
                "Durex",
                95_000,
                "Kích thước 49mm dành cho người châu Á, ôm khít an toàn.",
                "Kích cỡ",
                "https://salt.tikicdn.com/cache/w300/ts/product/60/66/89/69df1a3ab1860a2291898d60ad9ee671.png",
                &["Size 49mm", "Ôm sát", "Không lo tuột"],
            ),
        ])
    }

    /// All products in display order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products whose name, category or brand contains `query`, ignoring case
    ///
    /// A blank query matches everything.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Product> + 'a {
        let needle = query.trim().to_lowercase();
        self.products.iter().filter(move |p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
                || p.brand.to_lowercase().contains(&needle)
        })
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` for an empty catalog
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Serialize the full catalog as a JSON array (the advisor's context)
    ///
    /// # Errors
    ///
    /// Returns a serialization error (not expected for plain product data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.products)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::shield_point()
    }
}

#[allow(clippy::too_many_arguments)] // Flat catalog literal
fn product(
    id: &str,
    name: &str,
    brand: &str,
    price: u64,
    description: &str,
    category: &str,
    image: &str,
    features: &[&str],
) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        brand: brand.to_string(),
        price: Money::new(price),
        description: description.to_string(),
        category: category.to_string(),
        image: image.to_string(),
        features: features.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(products: impl Iterator<Item = &'a Product>) -> Vec<&'a str> {
        products.map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn launch_range_has_eight_unique_products() {
        let catalog = Catalog::shield_point();
        assert_eq!(catalog.len(), 8);

        let mut seen: Vec<_> = ids(catalog.products().iter());
        seen.dedup();
        assert_eq!(seen, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
        assert_eq!(
            catalog.get(&ProductId::from("1")).map(|p| p.price),
            Some(Money::new(155_000))
        );
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let catalog = Catalog::shield_point();

        assert_eq!(ids(catalog.search("SAGAMI")), vec!["2"]);
        assert_eq!(ids(catalog.search("siêu mỏng")), vec!["1", "2", "7"]);
        assert_eq!(ids(catalog.search("okamoto")), vec!["7"]);
        assert_eq!(catalog.search("  ").count(), 8);
        assert_eq!(catalog.search("latex-free").count(), 0);
    }

    #[test]
    fn brand_search_matches_every_durex() {
        let catalog = Catalog::shield_point();
        assert_eq!(ids(catalog.search("durex")), vec!["1", "3", "4", "6", "8"]);
    }

    #[test]
    fn json_snapshot_carries_prices_as_numbers() {
        let json = Catalog::shield_point().to_json().unwrap_or_default();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(parsed[4]["name"], "OK Strawberry Flavour");
        assert_eq!(parsed[4]["price"], 45_000);
    }
}
