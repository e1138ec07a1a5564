use lesson_shop::{Catalog, HttpCatalog, Order, OrderLine, Result};

/// 對配置好的後端冒煙測試四個目錄端點。
/// 注意:會真的建立一筆訂單記錄
#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://backend-vp34.onrender.com".to_string());

    println!("🚀 測試目錄服務 HTTP 端點: {}", base_url);
    let catalog = HttpCatalog::new(&base_url);

    // GET /lessons
    let lessons = catalog.list_lessons().await?;
    println!("📚 GET /lessons 回傳 {} 堂課", lessons.len());
    for lesson in lessons.iter().take(5) {
        println!(
            "  - {} @ {} (£{}, {} spaces)",
            lesson.subject, lesson.location, lesson.price, lesson.spaces
        );
    }

    // GET /search
    let hits = catalog.search_lessons("math").await?;
    println!("🔍 GET /search?q=math 回傳 {} 堂課", hits.len());

    if let Some(lesson) = lessons.first() {
        // PUT /update/:id 用現值寫回,冪等,不改變庫存
        let updated = catalog.update_spaces(&lesson.id, lesson.spaces).await?;
        println!(
            "♻️  PUT /update/{} 確認 {} spaces",
            updated.id, updated.spaces
        );

        // POST /order
        let order = Order {
            name: "Probe Tester".to_string(),
            phone: "0000000000".to_string(),
            lessons: vec![OrderLine {
                id: lesson.id.clone(),
                subject: lesson.subject.clone(),
                quantity: 1,
            }],
        };
        let confirmation = catalog.submit_order(&order).await?;
        println!("🧾 POST /order 接受: {:?}", confirmation.message);
    }

    println!("🎉 測試完成!");
    Ok(())
}
