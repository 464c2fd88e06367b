//! Server-rendered HTML for the public and admin pages.
//!
//! Every page is one Arabic RTL document built with `format!`; no template
//! engine and no client-side script. All store-sourced text passes through
//! [`escape_html`] on the way out. Story and ledger delete buttons sit
//! visually inside the big edit form but submit their own standalone forms
//! through the HTML `form` attribute, since forms cannot nest.

use charty_core::models::{DetailEntry, DetailKind, StoreData, Story};

/// Flash flags decoded from the query string after a redirect.
pub struct AdminFlash {
    pub bad_password: bool,
    pub saved: bool,
    pub added: bool,
    pub deleted: bool,
}

const STYLE: &str = r#"
:root { --ivory: #f7f4ea; --dark: #0f2e1c; --lime: #b9e769; --sand: #e3d9c2; --ink: #14281d; --gold: #d9a441; }
* { box-sizing: border-box; }
body { margin: 0; font-family: "Segoe UI", Tahoma, sans-serif; background: var(--ivory); color: var(--ink); }
a { color: inherit; }
header.hero { background: var(--dark); color: #fff; text-align: center; padding: 48px 24px; }
header.hero img { height: 140px; }
header.hero .badge { display: inline-block; border: 1px solid rgba(255,255,255,0.2); border-radius: 999px; padding: 6px 20px; font-size: 14px; color: rgba(255,255,255,0.6); }
header.hero h1 { font-size: 34px; margin: 12px 0 0; }
header.hero p { max-width: 640px; margin: 12px auto 0; font-size: 17px; color: rgba(255,255,255,0.8); }
header.bar { background: #fff; border-bottom: 1px solid rgba(15,46,28,0.1); padding: 24px; }
header.bar .inner { max-width: 960px; margin: 0 auto; display: flex; justify-content: space-between; align-items: center; gap: 16px; flex-wrap: wrap; }
header.bar .eyebrow { font-size: 14px; color: rgba(15,46,28,0.6); margin: 0; }
header.bar h1 { font-size: 24px; margin: 4px 0 0; color: var(--dark); }
main { max-width: 1080px; margin: 0 auto; padding: 32px 24px 64px; }
main.narrow { max-width: 480px; }
.panel { background: #fff; border-radius: 24px; padding: 32px; margin-bottom: 32px; box-shadow: 0 24px 60px -40px rgba(15,46,28,0.5); }
.panel h2 { margin: 0; color: var(--dark); }
.panel .hint { font-size: 14px; color: rgba(15,46,28,0.6); }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 16px; margin-top: 24px; }
.stat-card { background: var(--dark); color: #fff; border-radius: 16px; padding: 20px; }
.stat-card .chip { font-size: 12px; color: rgba(255,255,255,0.6); float: left; }
.stat-card .icon { background: rgba(255,255,255,0.1); border-radius: 999px; padding: 8px; display: inline-block; }
.stat-card .label { margin: 24px 0 0; font-size: 12px; color: rgba(255,255,255,0.6); }
.stat-card .value { margin: 8px 0 0; font-size: 30px; color: var(--lime); }
.stories { display: flex; gap: 24px; overflow-x: auto; padding-bottom: 16px; }
.story-card { min-width: 260px; max-width: 340px; background: #fff; border-radius: 24px; box-shadow: 0 18px 50px -35px rgba(15,46,28,0.4); }
.story-card img { width: 100%; height: 190px; object-fit: cover; border-radius: 24px 24px 0 0; }
.story-card .body { padding: 20px; }
.story-card h3 { margin: 0; color: var(--dark); }
.story-card p { margin: 8px 0 0; font-size: 14px; color: rgba(15,46,28,0.7); }
.progress-panel { background: var(--dark); color: #fff; border-radius: 24px; padding: 32px; }
.progress-track { height: 12px; border-radius: 999px; background: rgba(255,255,255,0.2); margin-top: 16px; }
.progress-fill { height: 100%; border-radius: 999px; background: var(--lime); }
.progress-scale { display: flex; justify-content: space-between; font-size: 12px; color: rgba(255,255,255,0.7); margin-top: 8px; }
footer { background: var(--ink); color: #fff; padding: 40px 24px; }
footer .inner { max-width: 1080px; margin: 0 auto; display: flex; justify-content: space-between; gap: 24px; flex-wrap: wrap; }
footer .phone { font-size: 18px; color: var(--lime); direction: ltr; }
footer details summary { cursor: pointer; border: 1px solid rgba(255,255,255,0.3); border-radius: 999px; padding: 8px 20px; display: inline-block; }
footer details ul { list-style: none; padding: 0; }
footer details li { background: rgba(255,255,255,0.08); border-radius: 12px; padding: 8px 12px; margin-top: 8px; font-size: 14px; }
.banner { border-radius: 16px; padding: 12px 16px; font-size: 14px; margin-bottom: 16px; }
.banner.ok { border: 1px solid rgba(185,231,105,0.4); background: rgba(185,231,105,0.2); color: var(--dark); }
.banner.muted { border: 1px solid var(--sand); background: var(--ivory); color: var(--dark); }
.banner.error { border: 1px solid #f3c1c1; background: #fdeaea; color: #a33a3a; }
label { display: flex; flex-direction: column; gap: 8px; font-size: 14px; }
input, textarea, select { border: 1px solid var(--sand); background: var(--ivory); border-radius: 12px; padding: 10px 16px; font: inherit; color: inherit; }
.grid-2 { display: grid; gap: 16px; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); }
.story-block { border: 1px solid var(--sand); background: var(--ivory); border-radius: 16px; padding: 16px; margin-top: 16px; display: grid; gap: 12px; }
.story-block input, .story-block textarea { background: #fff; }
.story-block .row { display: flex; justify-content: space-between; align-items: center; }
.story-block .row .pos { font-size: 12px; color: rgba(15,46,28,0.6); }
button { cursor: pointer; font: inherit; }
.btn-primary { background: var(--lime); color: var(--ink); border: none; border-radius: 999px; padding: 12px 24px; font-weight: 600; }
.btn-ghost { background: #fff; color: var(--dark); border: 1px solid rgba(15,46,28,0.1); border-radius: 999px; padding: 8px 16px; font-size: 14px; }
.btn-danger { background: none; border: 1px solid #f3c1c1; color: #c0392b; border-radius: 999px; padding: 4px 12px; font-size: 12px; }
table { width: 100%; border-collapse: collapse; background: #fff; border-radius: 16px; overflow: hidden; }
th { background: var(--ivory); color: rgba(15,46,28,0.7); text-align: right; padding: 12px 20px; font-size: 14px; }
td { padding: 14px 20px; border-top: 1px solid var(--ivory); font-size: 14px; }
.kind-badge { border-radius: 999px; padding: 4px 12px; font-size: 12px; }
.kind-income { background: rgba(185,231,105,0.3); color: var(--dark); }
.kind-expense { background: rgba(217,164,65,0.3); color: var(--dark); }
.kind-in-kind { background: var(--sand); color: var(--ink); }
.meta { font-size: 12px; color: rgba(15,46,28,0.6); }
"#;

const ICON_SURPLUS: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><path d="M12 3v18"/><path d="M7 7h8a3 3 0 0 1 0 6H9a3 3 0 0 0 0 6h8"/></svg>"#;
const ICON_DISKS: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><path d="M4 11h16"/><path d="M6 7h12"/><path d="M6 15h12"/><path d="M5 5h14v14H5z"/></svg>"#;
const ICON_FAMILIES: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><path d="M16 11a3 3 0 1 0-6 0v2"/><path d="M7 21v-3a4 4 0 0 1 4-4h2a4 4 0 0 1 4 4v3"/><circle cx="6" cy="9" r="2"/><circle cx="18" cy="9" r="2"/></svg>"#;
const ICON_PROJECTS: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><path d="M4 20h16"/><path d="M8 20V8l4-4 4 4v12"/><path d="M8 10h8"/><path d="M10 14h4"/></svg>"#;

/// Escape text for HTML element and attribute positions.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Group digits with thousands separators.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn format_amount(value: i64) -> String {
    if value < 0 {
        format!("-{}", format_number(value.unsigned_abs()))
    } else {
        format_number(value as u64)
    }
}

/// "one X" for a count of one, otherwise "N unit".
fn count_label(count: u64, singular: &str, unit: &str) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        format!("{} {}", format_number(count), unit)
    }
}

fn format_date(timestamp: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        Err(_) => "—".to_string(),
    }
}

fn format_datetime(timestamp: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => "—".to_string(),
    }
}

fn kind_label(kind: DetailKind) -> &'static str {
    match kind {
        DetailKind::Income => "مدخول",
        DetailKind::Expense => "صرف",
        DetailKind::InKind => "دعم عيني",
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"ar\" dir=\"rtl\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

// ============ Public dashboard ============

fn stat_card(icon: &str, label: &str, value: &str) -> String {
    format!(
        "<div class=\"stat-card\"><span class=\"chip\">محدث الآن</span><span class=\"icon\">{}</span><p class=\"label\">{}</p><p class=\"value\">{}</p></div>",
        icon, label, value
    )
}

fn story_card(story: &Story) -> String {
    let image = if story.image_url.is_empty() {
        "/place.png"
    } else {
        &story.image_url
    };
    format!(
        "<article class=\"story-card\"><img src=\"{image}\" alt=\"صورة مؤقتة لـ {title}\"><div class=\"body\"><h3>{title}</h3><p>{description}</p></div></article>",
        image = escape_html(image),
        title = escape_html(&story.title),
        description = escape_html(&story.description),
    )
}

/// Render the public dashboard.
pub fn render_home(data: &StoreData) -> String {
    let settings = &data.settings;
    // Stored percent may predate the write-boundary clamp.
    let progress = settings.progress_percent.min(100);

    let mut stats = String::new();
    stats.push_str(&stat_card(
        ICON_SURPLUS,
        "إجمالي فائض التبرعات",
        &format!("{} ليرة", format_number(settings.total_surplus)),
    ));
    stats.push_str(&stat_card(
        ICON_DISKS,
        "عدد الأقراص المُباعة",
        &count_label(settings.disks_sold, "قرص واحد", "قرص"),
    ));
    stats.push_str(&stat_card(
        ICON_FAMILIES,
        "العائلات المستفيدة",
        &count_label(settings.families_supported, "عائلة واحدة", "عائلة"),
    ));
    stats.push_str(&stat_card(
        ICON_PROJECTS,
        "مشاريع تم إطلاقها",
        &count_label(settings.projects_launched, "مشروع واحد", "مشروع"),
    ));

    let mut stories = String::new();
    for story in &data.stories {
        stories.push_str(&story_card(story));
    }

    let mut sales_items = String::new();
    for point in settings.sales_points.split('\n') {
        let point = point.trim();
        if !point.is_empty() {
            sales_items.push_str(&format!("<li>{}</li>", escape_html(point)));
        }
    }
    let sales_block = if sales_items.is_empty() {
        "<p>لا توجد أماكن مضافة بعد.</p>".to_string()
    } else {
        format!("<ul>{}</ul>", sales_items)
    };

    let body = format!(
        r#"<header class="hero">
<img src="/logo.png" alt="الإحسان">
<div><span class="badge">مبادرة الأثر الشفاف</span></div>
<h1>شكراً لأنك شريك في الخير</h1>
<p>بشرائك لقرص المحبة، أنت لم تُمتِّع نفسك فقط، بل بنيت مستقبلاً لغيرك.</p>
</header>
<main>
<section class="panel">
<p class="hint">لوحة العدادات الحية</p>
<h2>الأثر بالأرقام</h2>
<p class="hint">كل رقم يعكس مشروعاً قيد النمو</p>
<div class="stats">{stats}</div>
</section>
<section class="panel">
<h2>كيف يعمل نموذجنا؟</h2>
<p class="hint">نبيعك المنتج بسعر المواد الخام فقط. لا نأخذ أجراً على التصنيع، وأي مبلغ تضيفه يذهب 100% لدعم مشاريع العائلات.</p>
<div class="grid-2">
<div class="story-block"><p class="hint">سعر التكلفة (مواد فقط)</p><p class="value" style="font-size:28px;color:var(--dark);margin:0">{base_price} ليرة</p></div>
<div class="story-block"><p style="margin:0;font-weight:600">دعمك مفتوح بلا سقف</p><p class="hint" style="margin:8px 0 0">أي مبلغ تدفعه فوق سعر التكلفة يذهب 100% لدعم مشاريع العائلات، وكلما زاد دعمك زادت فرصنا لإطلاق مشاريع أكثر.</p></div>
</div>
</section>
<section>
<p class="hint">قصص النجاح</p>
<h2>شاهد أين ذهب تبرعك</h2>
<p class="hint">اسحب لمشاهدة المزيد من المشاريع</p>
<div class="stories">{stories}</div>
</section>
<section class="progress-panel">
<p class="hint" style="color:rgba(255,255,255,0.7)">شريط الحالة للمشروع القادم</p>
<h2 style="color:#fff">مشروعنا الحالي: {project_title}</h2>
<p>باقي {remaining} ليرة فقط لاكتمال هذا المشروع!</p>
<div class="progress-track"><div class="progress-fill" style="width:{progress}%"></div></div>
<div class="progress-scale"><span>0%</span><span>{progress}%</span><span>100%</span></div>
</section>
</main>
<footer>
<div class="inner">
<div><p style="font-size:18px;margin:0">الإحسان.. عطاء يثمر.</p><p style="color:rgba(255,255,255,0.7);font-size:14px">كن شريكاً دائماً في بناء فرص جديدة.</p></div>
<div><p style="font-size:14px;color:rgba(255,255,255,0.8)">تواصل معنا للتبرع أو التعاون</p><a class="phone" href="tel:+963991353511">+963991353511</a></div>
<details><summary>نقاط البيع</summary>{sales_block}</details>
</div>
</footer>"#,
        stats = stats,
        base_price = format_number(settings.base_price),
        stories = stories,
        project_title = escape_html(&settings.project_title),
        remaining = format_number(settings.remaining_amount),
        progress = progress,
        sales_block = sales_block,
    );

    page("الإحسان", &body)
}

// ============ Login ============

/// Render the login form shown to signed-out visitors of a gated page.
///
/// `redirect_to` is carried as a hidden field so a successful login lands
/// back where the visitor was headed.
pub fn render_login(flash: &AdminFlash, redirect_to: Option<&str>) -> String {
    let banner = if flash.bad_password {
        "<div class=\"banner error\">كلمة المرور غير صحيحة.</div>"
    } else {
        ""
    };
    let hidden = match redirect_to {
        Some(target) => format!(
            "<input type=\"hidden\" name=\"redirect_to\" value=\"{}\">",
            escape_html(target)
        ),
        None => String::new(),
    };

    let body = format!(
        r#"<header class="bar">
<div class="inner">
<div><p class="eyebrow">لوحة الإدارة</p><h1>تسجيل الدخول</h1></div>
<a href="/">العودة للواجهة الرئيسية</a>
</div>
</header>
<main class="narrow">
{banner}
<form method="post" action="/admin/login" class="panel">
{hidden}
<label>كلمة المرور<input name="password" type="password" autocomplete="current-password" required></label>
<button type="submit" class="btn-primary" style="margin-top:24px;width:100%">دخول</button>
</form>
</main>"#,
        banner = banner,
        hidden = hidden,
    );

    page("تسجيل الدخول", &body)
}

// ============ Admin panel ============

fn number_field(label: &str, name: &str, value: u64) -> String {
    format!(
        "<label>{}<input name=\"{}\" type=\"number\" min=\"0\" value=\"{}\"></label>",
        label, name, value
    )
}

fn story_block(story: &Story) -> String {
    format!(
        r#"<div class="story-block">
<input type="hidden" name="story_id" value="{id}">
<div class="row"><span class="pos">قصة رقم {position}</span><button type="submit" form="delete-story-{id}" class="btn-danger">حذف القصة</button></div>
<label>عنوان القصة<input name="story_title_{id}" type="text" value="{title}"></label>
<label>وصف مختصر<textarea name="story_description_{id}" rows="3">{description}</textarea></label>
<label>رابط الصورة (place.png مؤقتاً)<input name="story_image_{id}" type="text" value="{image}"></label>
</div>"#,
        id = story.id,
        position = story.position,
        title = escape_html(&story.title),
        description = escape_html(&story.description),
        image = escape_html(&story.image_url),
    )
}

/// One standalone delete form per story, referenced by the inline buttons.
fn story_delete_forms(stories: &[Story]) -> String {
    let mut forms = String::new();
    for story in stories {
        forms.push_str(&format!(
            "<form id=\"delete-story-{id}\" method=\"post\" action=\"/admin/story/delete\"><input type=\"hidden\" name=\"story_id\" value=\"{id}\"></form>",
            id = story.id
        ));
    }
    forms
}

fn admin_banners(flash: &AdminFlash) -> String {
    let mut banners = String::new();
    if flash.saved {
        banners.push_str("<div class=\"banner ok\">تم حفظ البيانات بنجاح.</div>");
    }
    if flash.added {
        banners.push_str("<div class=\"banner ok\">تمت إضافة قصة جديدة.</div>");
    }
    if flash.deleted {
        banners.push_str("<div class=\"banner muted\">تم حذف القصة بنجاح.</div>");
    }
    banners
}

/// Render the admin panel for a signed-in session.
pub fn render_admin(data: &StoreData, flash: &AdminFlash) -> String {
    let settings = &data.settings;

    let mut counters = String::new();
    counters.push_str(&number_field(
        "إجمالي فائض التبرعات",
        "total_surplus",
        settings.total_surplus,
    ));
    counters.push_str(&number_field(
        "عدد الأقراص المُباعة",
        "disks_sold",
        settings.disks_sold,
    ));
    counters.push_str(&number_field(
        "العائلات المستفيدة",
        "families_supported",
        settings.families_supported,
    ));
    counters.push_str(&number_field(
        "مشاريع تم إطلاقها",
        "projects_launched",
        settings.projects_launched,
    ));
    counters.push_str(&number_field(
        "عدد الزوار",
        "visitors_count",
        settings.visitors_count,
    ));

    let mut story_blocks = String::new();
    for story in &data.stories {
        story_blocks.push_str(&story_block(story));
    }

    let body = format!(
        r#"<header class="bar">
<div class="inner">
<div><p class="eyebrow">لوحة الإدارة</p><h1>إدخال وتحديث المعلومات</h1></div>
<div style="display:flex;gap:16px;align-items:center">
<a href="/">العودة للواجهة الرئيسية</a>
<a href="/details">لوحة التفاصيل</a>
<button type="submit" form="logout" class="btn-ghost">تسجيل الخروج</button>
</div>
</div>
</header>
<main>
{banners}
<form method="post" action="/admin/save">
<section class="panel">
<h2>لوحة العدادات الحية</h2>
<p class="hint">حدّث الأرقام الأساسية التي تظهر للزوار مباشرةً.</p>
<div class="grid-2">{counters}</div>
</section>
<section class="panel">
<h2>الشفافية المالية</h2>
<p class="hint">أدخل سعر التكلفة والمبلغ الزائد الذي يذهب للتمكين.</p>
<div class="grid-2">
{base_price}
{extra_price}
</div>
</section>
<section class="panel">
<h2>شريط حالة المشروع القادم</h2>
<p class="hint">خصص المشروع الحالي ونسبة الإنجاز.</p>
<label>عنوان المشروع<input name="project_title" type="text" value="{project_title}"></label>
<div class="grid-2" style="margin-top:16px">
<label>نسبة الإنجاز (%)<input name="progress_percent" type="number" min="0" max="100" value="{progress}"></label>
{remaining}
</div>
</section>
<section class="panel">
<h2>نقاط البيع</h2>
<p class="hint">أضف كل نقطة بيع في سطر مستقل ليظهر للزوار في النافذة المنبثقة.</p>
<label>قائمة الأماكن<textarea name="sales_points" rows="5">{sales_points}</textarea></label>
</section>
<section class="panel">
<div class="row" style="display:flex;justify-content:space-between;align-items:center">
<div><h2>قصص النجاح</h2><p class="hint">أدخل عناوين القصص والوصف، واستمر باستخدام صورة place.png مؤقتاً.</p></div>
<button type="submit" form="add-story" class="btn-ghost">إضافة قصة جديدة</button>
</div>
{story_blocks}
</section>
<button type="submit" class="btn-primary">حفظ البيانات</button>
<p class="meta">آخر تحديث: {updated_at}</p>
</form>
<form id="logout" method="post" action="/admin/logout"></form>
<form id="add-story" method="post" action="/admin/story/add"></form>
{delete_forms}
</main>"#,
        banners = admin_banners(flash),
        counters = counters,
        base_price = number_field("سعر القرص الأساسي", "base_price", settings.base_price),
        extra_price = number_field(
            "أي مبلغ إضافي (جميعه يذهب لدعم المشاريع)",
            "extra_price",
            settings.extra_price
        ),
        project_title = escape_html(&settings.project_title),
        progress = settings.progress_percent.min(100),
        remaining = number_field("المبلغ المتبقي (ليرة)", "remaining_amount", settings.remaining_amount),
        sales_points = escape_html(&settings.sales_points),
        story_blocks = story_blocks,
        updated_at = format_datetime(&settings.updated_at),
        delete_forms = story_delete_forms(&data.stories),
    );

    page("لوحة الإدارة", &body)
}

// ============ Details ledger ============

fn kind_select(entry: &DetailEntry) -> String {
    let mut options = String::new();
    for kind in [DetailKind::Income, DetailKind::Expense, DetailKind::InKind] {
        let selected = if kind == entry.kind { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            kind.as_str(),
            selected,
            kind_label(kind)
        ));
    }
    format!(
        "<select name=\"detail_kind_{}\">{}</select>",
        entry.id, options
    )
}

fn detail_row(entry: &DetailEntry) -> String {
    let amount_value = match entry.amount {
        Some(amount) => amount.to_string(),
        None => String::new(),
    };
    format!(
        r#"<tr>
<td><input type="hidden" name="detail_id" value="{id}"><span class="kind-badge kind-{kind}">{label}</span><div style="margin-top:8px">{select}</div></td>
<td><input name="detail_description_{id}" type="text" value="{description}"></td>
<td><input name="detail_amount_{id}" type="text" inputmode="numeric" value="{amount}" placeholder="مساهمة غير نقدية"></td>
<td>{date}<div style="margin-top:8px"><button type="submit" form="delete-detail-{id}" class="btn-danger">حذف</button></div></td>
</tr>"#,
        id = entry.id,
        kind = entry.kind.as_str(),
        label = kind_label(entry.kind),
        select = kind_select(entry),
        description = escape_html(&entry.description),
        amount = amount_value,
        date = format_date(&entry.created_at),
    )
}

fn detail_delete_forms(details: &[DetailEntry]) -> String {
    let mut forms = String::new();
    for entry in details {
        forms.push_str(&format!(
            "<form id=\"delete-detail-{id}\" method=\"post\" action=\"/admin/detail/delete\"><input type=\"hidden\" name=\"detail_id\" value=\"{id}\"></form>",
            id = entry.id
        ));
    }
    forms
}

fn details_banners(flash: &AdminFlash) -> String {
    let mut banners = String::new();
    if flash.saved {
        banners.push_str("<div class=\"banner ok\">تم حفظ البنود بنجاح.</div>");
    }
    if flash.added {
        banners.push_str("<div class=\"banner ok\">تمت إضافة بند جديد.</div>");
    }
    if flash.deleted {
        banners.push_str("<div class=\"banner muted\">تم حذف البند بنجاح.</div>");
    }
    banners
}

/// Render the ledger page for a signed-in session, newest entries first.
pub fn render_details(details: &[DetailEntry], flash: &AdminFlash) -> String {
    let table = if details.is_empty() {
        "<div class=\"panel\" style=\"font-size:14px\">لا توجد بنود بعد.</div>".to_string()
    } else {
        let mut rows = String::new();
        for entry in details.iter().rev() {
            rows.push_str(&detail_row(entry));
        }
        format!(
            r#"<table>
<thead><tr><th>النوع</th><th>الوصف</th><th>القيمة (ليرة)</th><th>التاريخ</th></tr></thead>
<tbody>{rows}</tbody>
</table>
<button type="submit" class="btn-primary" style="margin-top:24px">حفظ البنود</button>"#,
            rows = rows
        )
    };

    let body = format!(
        r#"<header class="bar">
<div class="inner">
<div><p class="eyebrow">المدخلات والمخرجات</p><h1>تفاصيل ما يدخل وما يُصرف</h1></div>
<div style="display:flex;gap:16px;align-items:center">
<a href="/">العودة للواجهة الرئيسية</a>
<a href="/admin">لوحة الإدارة</a>
<button type="submit" form="add-detail" class="btn-ghost">إضافة بند جديد</button>
</div>
</div>
</header>
<main>
<p class="hint">هذه القائمة توضح أبرز المدخلات والمخرجات والمساهمات العينية المرتبطة بالمبادرة لضمان وضوح كامل عند فتحها للعلن.</p>
{banners}
<form method="post" action="/admin/detail/save">
{table}
</form>
<form id="add-detail" method="post" action="/admin/detail/add"></form>
{delete_forms}
</main>"#,
        banners = details_banners(flash),
        table = table,
        delete_forms = detail_delete_forms(details),
    );

    page("لوحة التفاصيل", &body)
}
