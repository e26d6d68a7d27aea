//! Normalization from raw upstream product records to [`invdash_core::Product`].
//!
//! Every canonical field is read through a [`FieldPolicy`] declared below, in
//! priority order. Two defaulting rules apply to numbers: commercial and stock
//! quantities default to zero (or the configured minimum), while physical
//! measurements stay `None` so a missing dimension is never shown as `0cm`.

use invdash_core::{ImageSize, Product, ProductImage, ProductStatus};
use serde_json::Value;

use crate::fields::{coerce_text, fold_key, FieldPolicy};

pub const PLACEHOLDER_NAME: &str = "Produto sem nome";
pub const PLACEHOLDER_CATEGORY: &str = "Sem categoria";
pub const PLACEHOLDER_BRAND: &str = "Sem marca";
pub const PLACEHOLDER_SUPPLIER: &str = "N/A";
pub const PLACEHOLDER_SKU: &str = "N/A";
pub const DEFAULT_UNIT: &str = "UN";
pub const DEFAULT_MIN_STOCK: f64 = 10.0;

macro_rules! policy {
    ($name:ident, $field:literal, [$($path:expr),+ $(,)?]) => {
        pub const $name: FieldPolicy = FieldPolicy {
            field: $field,
            candidates: &[$($path),+],
        };
    };
}

// Identity
policy!(ID, "id", [&["id"], &["productId"], &["_id"], &["uuid"]]);
policy!(SKU, "sku", [&["sku"], &["code"], &["codigo"], &["reference"]]);
policy!(SUPPLIER_SKU, "supplierSku", [&["supplierSku"], &["skuSupplier"], &["supplier_sku"]]);

// Descriptive
policy!(NAME, "name", [&["name"], &["title"], &["nome"]]);
policy!(FISCAL_NAME, "fiscalName", [&["fiscalName"], &["fiscal_name"], &["invoiceName"]]);
policy!(DESCRIPTION, "description", [&["description"], &["descricao"], &["details"]]);
policy!(CATEGORY, "category", [&["category", "name"], &["categoryName"], &["category"]]);
policy!(CATEGORY_ID, "categoryId", [&["category", "id"], &["categoryId"], &["category_id"]]);
policy!(BRAND, "brand", [&["brand", "name"], &["brandName"], &["brand"]]);

// Commercial
policy!(PRICE, "price", [&["price"], &["salePrice"], &["sellPrice"], &["preco"]]);
policy!(COST_PRICE, "costPrice", [&["costPrice"], &["cost"], &["cost_price"]]);
policy!(COST_PRICE_WITH_TAXES, "costPriceWithTaxes", [&["costPriceWithTaxes"], &["costWithTaxes"]]);

// Stock. `avaiableQuantity` is a misspelling the upstream API really emits.
policy!(STOCK, "stock", [&["availableQuantity"], &["avaiableQuantity"], &["stock"], &["quantity"]]);
policy!(RESERVED_QUANTITY, "reservedQuantity", [&["reservedQuantity"], &["reserved"]]);
policy!(MIN_STOCK, "minStock", [&["minStock"], &["minimumStock"], &["min_stock"], &["stockMin"]]);
policy!(MAX_STOCK, "maxStock", [&["maxStock"], &["maximumStock"], &["max_stock"], &["stockMax"]]);
policy!(UNIT, "unit", [&["unit"], &["unitType"], &["unidade"]]);
policy!(UNITS_BY_BOX, "unitsByBox", [&["unitsByBox"], &["unitsPerBox"], &["boxQuantity"]]);

// Activity flags
policy!(ACTIVE, "active", [&["active"], &["isActive"], &["enabled"]]);
policy!(INACTIVE, "inactive", [&["inactive"], &["isInactive"], &["disabled"]]);
policy!(STATUS_TEXT, "status", [&["status"], &["situation"], &["situacao"]]);

// Supplier
policy!(SUPPLIER, "supplier", [
    &["supplier", "name"],
    &["supplier", "tradeName"],
    &["supplierName"],
    &["provider", "name"],
    &["supplier"],
]);
policy!(SUPPLIER_ID, "supplierId", [&["supplier", "id"], &["supplierId"], &["provider", "id"]]);
policy!(SUPPLIER_DOCUMENT, "supplierDocument", [
    &["supplier", "cnpj"],
    &["supplier", "document"],
    &["supplierCnpj"],
    &["supplierDocument"],
]);
policy!(SUPPLIER_STATE_REGISTRATION, "supplierStateRegistration", [
    &["supplier", "stateRegistration"],
    &["supplier", "ie"],
    &["supplierStateRegistration"],
]);

// Physical
policy!(WEIGHT, "weight", [&["weight"], &["grossWeight"], &["dimensions", "weight"]]);
policy!(BOX_WEIGHT, "boxWeight", [&["boxWeight"], &["box_weight"]]);
policy!(HEIGHT, "height", [&["height"], &["dimensions", "height"]]);
policy!(WIDTH, "width", [&["width"], &["dimensions", "width"]]);
policy!(LENGTH, "length", [&["length"], &["depth"], &["dimensions", "length"]]);

// Media
policy!(IMAGES, "images", [&["images"], &["photos"], &["pictures"]]);
policy!(FLAT_IMAGE, "imageUrl", [&["imageUrl"], &["image"], &["thumbnail"]]);
policy!(IMAGE_COVER, "isCover", [&["isCover"], &["cover"], &["main"], &["principal"]]);
policy!(IMAGE_SIZES, "sizes", [&["sizes"], &["urls"]]);
policy!(IMAGE_URL, "url", [&["url"], &["src"], &["link"]]);
policy!(VIDEO_LINK, "videoLink", [&["videoLink"], &["videoUrl"], &["video"]]);

// Timestamps
policy!(CREATED_AT, "createdAt", [&["createdAt"], &["created_at"], &["dateCreated"]]);
policy!(UPDATED_AT, "updatedAt", [&["updatedAt"], &["updated_at"], &["dateUpdated"]]);

// Sales velocity
policy!(AVG_SELLS_7, "avgSellsQuantityPast7Days", [&["avgSellsQuantityPast7Days"]]);
policy!(AVG_SELLS_15, "avgSellsQuantityPast15Days", [&["avgSellsQuantityPast15Days"]]);
policy!(AVG_SELLS_30, "avgSellsQuantityPast30Days", [&["avgSellsQuantityPast30Days"]]);
policy!(SOLD_QUANTITY, "soldQuantity", [&["soldQuantity"], &["sold"], &["totalSold"]]);

/// Normalizes a raw upstream record into a [`Product`].
///
/// Pure and total: any JSON value produces a product, with placeholders and
/// defaults standing in for whatever the record lacks.
#[must_use]
pub fn normalize_product(raw: &Value) -> Product {
    let stock = STOCK.number(raw).unwrap_or(0.0);
    let min_stock = MIN_STOCK.number(raw).unwrap_or(DEFAULT_MIN_STOCK);
    let status = ProductStatus::from_stock_levels(stock, min_stock, is_flagged_inactive(raw));

    let name = NAME.text(raw).unwrap_or_else(|| PLACEHOLDER_NAME.to_owned());
    let fiscal_name = FISCAL_NAME.text(raw).unwrap_or_else(|| name.clone());
    let sku = SKU.text(raw).unwrap_or_else(|| PLACEHOLDER_SKU.to_owned());

    let width = WIDTH.number(raw);
    let height = HEIGHT.number(raw);
    let length = LENGTH.number(raw);

    let images = collect_images(raw);
    let image_url = cover_image(&images)
        .and_then(ProductImage::best_url)
        .map(str::to_owned)
        .or_else(|| FLAT_IMAGE.text(raw));

    let cost_price = COST_PRICE.number(raw).unwrap_or(0.0);

    Product {
        id: ID.text(raw).unwrap_or_default(),
        sku,
        supplier_sku: SUPPLIER_SKU.text(raw),
        name,
        fiscal_name,
        description: DESCRIPTION.text(raw).unwrap_or_default(),
        category: CATEGORY
            .text(raw)
            .unwrap_or_else(|| PLACEHOLDER_CATEGORY.to_owned()),
        category_id: CATEGORY_ID.text(raw),
        brand: BRAND.text(raw).unwrap_or_else(|| PLACEHOLDER_BRAND.to_owned()),
        price: PRICE.number(raw).unwrap_or(0.0),
        cost_price,
        cost_price_with_taxes: COST_PRICE_WITH_TAXES.number(raw).unwrap_or(0.0),
        stock,
        reserved_quantity: RESERVED_QUANTITY.number(raw).unwrap_or(0.0),
        min_stock,
        max_stock: MAX_STOCK.number(raw),
        unit: UNIT.text(raw).unwrap_or_else(|| DEFAULT_UNIT.to_owned()),
        units_by_box: UNITS_BY_BOX.number(raw),
        status,
        supplier: SUPPLIER
            .text(raw)
            .unwrap_or_else(|| PLACEHOLDER_SUPPLIER.to_owned()),
        supplier_id: SUPPLIER_ID.text(raw),
        supplier_document: SUPPLIER_DOCUMENT.text(raw),
        supplier_state_registration: SUPPLIER_STATE_REGISTRATION.text(raw),
        weight: WEIGHT.number(raw),
        box_weight: BOX_WEIGHT.number(raw),
        height,
        width,
        length,
        dimensions: format_dimensions(width, height, length),
        image_url,
        images,
        video_link: VIDEO_LINK.text(raw),
        created_at: CREATED_AT.timestamp(raw),
        updated_at: UPDATED_AT.timestamp(raw),
        avg_sells_quantity_past_7_days: AVG_SELLS_7.number(raw),
        avg_sells_quantity_past_15_days: AVG_SELLS_15.number(raw),
        avg_sells_quantity_past_30_days: AVG_SELLS_30.number(raw),
        sold_quantity: SOLD_QUANTITY.number(raw),
    }
}

/// `true` when the record explicitly marks the product as inactive:
/// `active: false`, `inactive: true`, or an inactive status word.
fn is_flagged_inactive(raw: &Value) -> bool {
    if ACTIVE.flag(raw) == Some(false) || INACTIVE.flag(raw) == Some(true) {
        return true;
    }
    STATUS_TEXT.text(raw).is_some_and(|status| {
        matches!(
            fold_key(&status).as_str(),
            "inactive" | "inativo" | "disabled" | "desativado"
        )
    })
}

/// `"{width} x {height} x {length} cm"`, only when all three are known.
fn format_dimensions(
    width: Option<f64>,
    height: Option<f64>,
    length: Option<f64>,
) -> Option<String> {
    match (width, height, length) {
        (Some(w), Some(h), Some(l)) => Some(format!("{w} x {h} x {l} cm")),
        _ => None,
    }
}

/// The image flagged as cover, else the first one.
fn cover_image(images: &[ProductImage]) -> Option<&ProductImage> {
    images
        .iter()
        .find(|image| image.is_cover)
        .or_else(|| images.first())
}

/// Gallery entries in upstream order. Entries may be bare URL strings or
/// objects carrying size-keyed URLs, either under `sizes`/`urls` or directly.
fn collect_images(raw: &Value) -> Vec<ProductImage> {
    let Some(Value::Array(entries)) = IMAGES.lookup(raw) else {
        return Vec::new();
    };
    entries.iter().filter_map(normalize_image).collect()
}

fn normalize_image(entry: &Value) -> Option<ProductImage> {
    if entry.is_string() {
        return coerce_text(entry).map(|url| ProductImage {
            url: Some(url),
            ..ProductImage::default()
        });
    }
    let object = entry.as_object()?;

    let mut image = ProductImage {
        is_cover: IMAGE_COVER.flag(entry).unwrap_or(false),
        url: IMAGE_URL.text(entry),
        ..ProductImage::default()
    };

    let size_source = match IMAGE_SIZES.lookup(entry) {
        Some(Value::Object(sizes)) => sizes,
        _ => object,
    };
    for (key, value) in size_source {
        if let (Some(size), Some(url)) = (image_size_from_key(key), coerce_text(value)) {
            image.sizes.entry(size).or_insert(url);
        }
    }

    (image.url.is_some() || !image.sizes.is_empty()).then_some(image)
}

fn image_size_from_key(key: &str) -> Option<ImageSize> {
    match fold_key(key).as_str() {
        "original" | "full" | "raw" => Some(ImageSize::Original),
        "large" | "lg" | "big" | "xl" => Some(ImageSize::Large),
        "medium" | "md" => Some(ImageSize::Medium),
        "small" | "sm" => Some(ImageSize::Small),
        "thumbnail" | "thumb" | "xs" | "mini" => Some(ImageSize::Thumbnail),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
