use crate::views::navigation::{footer, sidebar};
use chrono::{Datelike, Local};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }

    out
}

/// Full document: sidebar, optional configuration banner, page body.
pub fn page(current_path: &str, title: &str, body: &str, config_error: Option<&str>) -> String {
    let nav: String = sidebar(current_path)
        .iter()
        .map(|item| {
            format!(
                r#"<a href="{}" class="{}">{}</a>"#,
                item.route.path(),
                if item.active { "nav active" } else { "nav" },
                item.route.label()
            )
        })
        .collect();

    let banner = config_error
        .map(|message| format!(r#"<div class="banner">{}</div>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="nl">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Trading Dashboard</title>
<style>{style}</style>
</head>
<body>
<div class="app">
<aside>
<div class="brand">Trading Dashboard</div>
<nav>{nav}</nav>
<div class="footer">{footer}</div>
</aside>
<main>
{banner}
<h1>{title}</h1>
{body}
</main>
</div>
<script>{script}</script>
</body>
</html>"#,
        title = escape(title),
        style = STYLE,
        nav = nav,
        footer = footer(Local::now().year()),
        banner = banner,
        body = body,
        script = SCRIPT,
    )
}

const STYLE: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: #f8fafc; color: #0f172a; }
.app { display: grid; grid-template-columns: 240px 1fr; min-height: 100vh; }
aside { background: #0f172a; color: #e2e8f0; padding: 16px; }
.brand { font-weight: 700; font-size: 18px; margin-bottom: 16px; }
nav { display: grid; gap: 6px; }
a.nav { display: block; padding: 10px 12px; border-radius: 10px; color: #e2e8f0; text-decoration: none; }
a.nav.active { background: #38bdf8; color: #0f172a; }
.footer { margin-top: 16px; font-size: 12px; opacity: 0.7; }
main { padding: 24px; }
.banner { background: #fee2e2; color: #991b1b; border: 1px solid #fecaca; border-radius: 8px; padding: 12px 16px; margin-bottom: 16px; }
.cards { display: grid; gap: 16px; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); }
.card { background: #fff; border: 1px solid #e5e7eb; border-radius: 12px; padding: 16px; }
.card .title { font-size: 12px; color: #64748b; }
.card .value { font-size: 22px; font-weight: 700; }
.card .sub { font-size: 12px; color: #334155; }
.box { overflow-x: auto; background: #fff; border: 1px solid #e5e7eb; border-radius: 12px; margin-top: 16px; }
table { width: 100%; border-collapse: collapse; }
th { text-align: left; padding: 10px 12px; background: #e2e8f0; font-weight: 700; }
td { padding: 10px 12px; border-top: 1px solid #e5e7eb; }
.error { color: #b91c1c; margin: 8px 0; }
.hint { font-size: 12px; color: #64748b; }
section { display: grid; gap: 12px; margin-bottom: 24px; }
.grid { display: grid; gap: 12px; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); }
label { display: grid; gap: 6px; }
label span { font-size: 12px; color: #475569; }
input, select { padding: 8px 10px; border: 1px solid #e5e7eb; border-radius: 8px; }
input[type=checkbox] { width: 18px; height: 18px; }
button { padding: 10px 14px; background: #38bdf8; color: #0f172a; border: none; border-radius: 8px; font-weight: 700; cursor: pointer; }
.filters a { margin-right: 12px; }
"#;

const SCRIPT: &str = r#"
function esc(s) {
  return String(s == null ? '' : s).replace(/[&<>"']/g, function (c) {
    return { '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c];
  });
}
function socketUrl(path) {
  return (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + path;
}
document.querySelectorAll('table[data-live]').forEach(function (table) {
  var ws = new WebSocket(socketUrl(table.dataset.live));
  var errorBox = document.getElementById(table.id + '-error');
  ws.onmessage = function (ev) {
    var msg = JSON.parse(ev.data);
    if (msg.type !== 'rows') return;
    var cols = table.tHead.rows[0].cells.length;
    var html = msg.rows.map(function (row) {
      return '<tr>' + row.map(function (cell) { return '<td>' + esc(cell) + '</td>'; }).join('') + '</tr>';
    }).join('');
    if (!msg.rows.length && !msg.loading) {
      html = '<tr><td colspan="' + cols + '">' + esc(msg.empty) + '</td></tr>';
    }
    if (!msg.loading || msg.rows.length) table.tBodies[0].innerHTML = html;
    if (errorBox) errorBox.textContent = msg.error || '';
  };
});
(function () {
  var form = document.getElementById('settings-form');
  if (!form) return;
  var loading = document.getElementById('settings-loading');
  var status = document.getElementById('settings-status');
  var validation = document.getElementById('settings-validation');
  var loadError = document.getElementById('settings-load-error');
  var lastServerForm = null;
  var ws = new WebSocket(socketUrl('/ws/instellingen'));

  function setPath(obj, path, value) {
    var keys = path.split('.');
    var last = keys.pop();
    keys.forEach(function (k) { obj = obj[k] = obj[k] || {}; });
    obj[last] = value;
  }
  function getPath(obj, path) {
    return path.split('.').reduce(function (o, k) { return o == null ? o : o[k]; }, obj);
  }
  function readForm() {
    var out = {};
    form.querySelectorAll('[name]').forEach(function (el) {
      var kind = el.dataset.kind;
      if (kind === 'bool') return setPath(out, el.name, el.checked);
      if (kind === 'number' || kind === 'int') {
        var v = kind === 'int' ? parseInt(el.value, 10) : parseFloat(el.value);
        if (!isNaN(v)) setPath(out, el.name, v);
        return;
      }
      setPath(out, el.name, el.value);
    });
    return out;
  }
  function fillForm(data) {
    form.querySelectorAll('[name]').forEach(function (el) {
      var v = getPath(data, el.name);
      if (el.dataset.kind === 'bool') el.checked = !!v;
      else el.value = v == null ? '' : v;
    });
  }
  function send(type) {
    ws.send(JSON.stringify({ type: type, form: readForm() }));
  }
  form.addEventListener('change', function () { send('edit'); });
  form.addEventListener('submit', function (ev) { ev.preventDefault(); send('save'); });
  ws.onmessage = function (ev) {
    var msg = JSON.parse(ev.data);
    if (msg.type !== 'state') return;
    loading.style.display = msg.loaded ? 'none' : '';
    form.style.display = msg.loaded ? '' : 'none';
    var serverForm = JSON.stringify(msg.form);
    if (serverForm !== lastServerForm) {
      lastServerForm = serverForm;
      fillForm(msg.form);
    }
    status.textContent = msg.status || '';
    validation.textContent = msg.validation_error || '';
    loadError.textContent = msg.load_error || '';
  };
})();
"#;
