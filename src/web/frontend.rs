//! Embedded HTML/CSS/JS frontend for the heliox web dashboard.
//!
//! Both pages are compiled into the binary as string constants.
//! No external assets, no build tools, no CDN dependencies.

/// Shared stylesheet, spliced into both pages.
macro_rules! styles {
    () => {
        r##"<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header nav a { color: var(--text-muted); margin-left: 16px; text-decoration: none; }
header nav a:hover { color: var(--text); }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}
.card h2 { font-size: 15px; font-weight: 600; margin-bottom: 12px; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(340px, 1fr)); gap: 16px; }
.muted { color: var(--text-muted); }
.error { color: var(--red); }
.ok { color: var(--green); }

button, input, select {
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 6px 10px;
  font: inherit;
}
button { background: var(--accent); color: #0d1117; border: none; font-weight: 600; cursor: pointer; }
button:disabled { opacity: 0.4; cursor: not-allowed; }
button.secondary { background: transparent; color: var(--accent); border: 1px solid var(--accent); }

.badge { font-size: 12px; padding: 2px 8px; border-radius: 10px; border: 1px solid var(--border); }
.badge.ok { border-color: var(--green); }
.badge.error { border-color: var(--red); }
</style>"##
    };
}

/// Landing page: product pitch and waitlist form.
pub const LANDING_HTML: &str = concat!(
    r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Heliox — GPU spend, under control</title>
"##,
    styles!(),
    r##"
<style>
.hero { text-align: center; padding: 64px 0 40px; }
.hero h2 { font-size: 40px; font-weight: 700; margin-bottom: 12px; }
.hero p { color: var(--text-muted); font-size: 17px; max-width: 640px; margin: 0 auto; }
.features { margin: 32px 0; }
.features .card p { color: var(--text-muted); }
form.waitlist { max-width: 480px; margin: 40px auto; display: grid; gap: 10px; }
form.waitlist .banner { padding: 10px; border-radius: 6px; display: none; }
form.waitlist .banner.show { display: block; }
form.waitlist .banner.ok { border: 1px solid var(--green); }
form.waitlist .banner.error { border: 1px solid var(--red); }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1><span class="logo">heliox</span></h1>
    <nav><a href="/dashboard">Dashboard</a></nav>
  </header>

  <section class="hero">
    <h2>Know where every GPU hour goes.</h2>
    <p>Heliox tracks spend across clouds, teams, and models, forecasts where
    it is heading, and points at the idle capacity you are paying for.</p>
  </section>

  <section class="grid features">
    <div class="card"><h2>Cost attribution</h2><p>Spend broken down by model and by team, for any date range.</p></div>
    <div class="card"><h2>Forecasting</h2><p>Projected spend with a 95% confidence band, per provider and GPU type.</p></div>
    <div class="card"><h2>Recommendations</h2><p>Idle GPUs, runaway jobs, and off-hours usage, ranked by potential savings.</p></div>
  </section>

  <form class="waitlist card" id="waitlist" novalidate>
    <h2>Join the waitlist</h2>
    <input id="wl-name" placeholder="Name" autocomplete="name">
    <input id="wl-email" placeholder="Work email (required)" autocomplete="email">
    <input id="wl-company" placeholder="Company" autocomplete="organization">
    <input id="wl-role" placeholder="Role">
    <button id="wl-submit" type="submit" disabled>Join waitlist</button>
    <div id="wl-banner" class="banner"></div>
  </form>
</div>

<script>
const fields = ['name', 'email', 'company', 'role'];
const $ = id => document.getElementById(id);

function canSubmit() {
  const email = $('wl-email').value.trim();
  return email.length > 0 && email.includes('@');
}

function refresh() { $('wl-submit').disabled = !canSubmit(); }
fields.forEach(f => $('wl-' + f).addEventListener('input', refresh));

function banner(message, ok) {
  const el = $('wl-banner');
  el.textContent = message;
  el.className = 'banner show ' + (ok ? 'ok' : 'error');
}

$('waitlist').addEventListener('submit', async ev => {
  ev.preventDefault();
  if (!canSubmit()) return;
  const body = {};
  fields.forEach(f => body[f] = $('wl-' + f).value);
  $('wl-submit').disabled = true;
  $('wl-submit').textContent = 'Submitting…';
  try {
    const res = await fetch('/api/waitlist', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body),
    });
    const data = await res.json();
    banner(data.message || data.error || 'Something went wrong.', res.ok);
    if (data.cleared) fields.forEach(f => $('wl-' + f).value = '');
  } catch (e) {
    banner('Could not reach the server. Check your connection and try again.', false);
  } finally {
    $('wl-submit').textContent = 'Join waitlist';
    refresh();
  }
});
</script>
</body>
</html>
"##
);

/// Dashboard page: date range, four chart panels, recommendations.
pub const DASHBOARD_HTML: &str = concat!(
    r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Heliox Dashboard</title>
"##,
    styles!(),
    r##"
<style>
.controls { display: flex; gap: 12px; align-items: center; flex-wrap: wrap; margin-bottom: 16px; }
.bar-row { display: grid; grid-template-columns: 140px 1fr 90px; gap: 8px; align-items: center; margin: 4px 0; }
.bar-row .label { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.bar-row .bar { height: 12px; border-radius: 3px; }
.bar-row .value { text-align: right; font-family: var(--mono); font-size: 12px; }
svg { width: 100%; height: 180px; }
.rec { border-top: 1px solid var(--border); padding: 10px 0; }
.rec .sev { font-size: 11px; font-weight: 700; text-transform: uppercase; margin-right: 8px; }
.rec .sev.high { color: var(--red); }
.rec .sev.medium { color: var(--yellow); }
.rec .sev.low { color: var(--accent); }
.summary { display: flex; gap: 24px; margin-bottom: 8px; }
section { margin-bottom: 16px; }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1><span class="logo">heliox</span> dashboard</h1>
    <nav><span id="health" class="badge">checking…</span><a href="/">Home</a></nav>
  </header>

  <div class="controls">
    <label>From <input type="date" id="start"></label>
    <label>To <input type="date" id="end"></label>
    <label>Forecast
      <select id="horizon">
        <option value="7">7 days</option>
        <option value="14" selected>14 days</option>
        <option value="30">30 days</option>
      </select>
    </label>
    <button id="apply">Apply</button>
  </div>

  <section class="grid">
    <div class="card"><h2>Daily spend</h2><div id="trend"></div></div>
    <div class="card"><h2>Spend forecast</h2><div id="forecast"></div></div>
    <div class="card"><h2>Cost by model</h2><div id="by_model"></div></div>
    <div class="card"><h2>Cost by team</h2><div id="by_team"></div></div>
  </section>

  <section class="card">
    <h2>Recommendations</h2>
    <div class="controls">
      <select id="severity">
        <option value="all">All severities</option>
        <option value="high">High</option>
        <option value="medium">Medium</option>
        <option value="low">Low</option>
      </select>
      <select id="provider"><option value="all">All providers</option></select>
      <select id="type">
        <option value="all">All types</option>
        <option value="idle_gpu">Idle GPU</option>
        <option value="long_running_job">Long-running job</option>
        <option value="off_hours_usage">Off-hours usage</option>
        <option value="cost_optimization">Cost optimization</option>
      </select>
      <input id="search" placeholder="Search title, team, GPU, provider">
      <button id="export" class="secondary" disabled>Export CSV</button>
    </div>
    <div id="recs"></div>
  </section>
</div>

<script>
const $ = id => document.getElementById(id);
const NO_DATA = 'No data available for the selected date range.';

function usd(n) {
  return '$' + Number(n).toLocaleString(undefined, { minimumFractionDigits: 2, maximumFractionDigits: 2 });
}

function esc(s) {
  const d = document.createElement('div');
  d.textContent = s == null ? '' : String(s);
  return d.innerHTML;
}

// Render the non-ready branches of a panel. Returns the data when ready.
function settled(el, state, retry) {
  if (state.status === 'ready') return state.data;
  if (state.status === 'empty') { el.innerHTML = `<p class="muted">${NO_DATA}</p>`; return null; }
  if (state.status === 'error') {
    el.innerHTML = `<p class="error">${esc(state.data)}</p><button class="secondary">Retry</button>`;
    el.querySelector('button').onclick = retry;
    return null;
  }
  el.innerHTML = '<p class="muted">Loading…</p>';
  return null;
}

function bars(el, slices) {
  const max = Math.max(...slices.map(s => s.value), 0);
  el.innerHTML = slices.map(s => `
    <div class="bar-row">
      <span class="label" title="${esc(s.label)}">${esc(s.label)}</span>
      <div class="bar" style="width:${max ? (s.value / max * 100) : 0}%;background:${s.color}"></div>
      <span class="value">${usd(s.value)} · ${s.share_pct.toFixed(1)}%</span>
    </div>`).join('');
}

// Polyline over a shared x-axis; null values break the line.
function line(values, max, color, n) {
  let d = '', pen = false;
  values.forEach((v, i) => {
    if (v == null) { pen = false; return; }
    const x = n > 1 ? i / (n - 1) * 580 + 10 : 300;
    const y = 170 - (max ? v / max * 160 : 0);
    d += (pen ? 'L' : 'M') + x.toFixed(1) + ',' + y.toFixed(1);
    pen = true;
  });
  return `<path d="${d}" fill="none" stroke="${color}" stroke-width="2"/>`;
}

function renderTrend(state) {
  const el = $('trend');
  const points = settled(el, state, () => load(true));
  if (!points) return;
  const max = Math.max(...points.map(p => p.cost));
  el.innerHTML = `<svg viewBox="0 0 600 180">${line(points.map(p => p.cost), max, '#58a6ff', points.length)}</svg>`;
}

function renderForecast(state, total) {
  const el = $('forecast');
  const rows = settled(el, state, () => load(true));
  if (!rows) return;
  const max = Math.max(...rows.map(r => Math.max(r.upper ?? 0, r.actual ?? 0, r.forecast ?? 0)));
  const n = rows.length;
  el.innerHTML = `<svg viewBox="0 0 600 180">
      ${line(rows.map(r => r.upper), max, '#30363d', n)}
      ${line(rows.map(r => r.lower), max, '#30363d', n)}
      ${line(rows.map(r => r.actual), max, '#58a6ff', n)}
      ${line(rows.map(r => r.forecast), max, '#bc8cff', n)}
    </svg>
    <p class="muted">${esc(rows[0].label)} – ${esc(rows[n - 1].label)} · projected ${usd(total ?? 0)}</p>`;
}

async function load(retry) {
  const q = new URLSearchParams({ start: $('start').value, end: $('end').value, horizon: $('horizon').value });
  if (retry) q.set('retry', '1');
  const res = await fetch('/api/dashboard?' + q);
  const snap = await res.json();
  if (!res.ok) { $('trend').innerHTML = `<p class="error">${esc(snap.error)}</p>`; return; }
  $('start').value = snap.start;
  $('end').value = snap.end;
  renderTrend(snap.trend);
  renderForecast(snap.forecast, snap.projected_total);
  const m = settled($('by_model'), snap.by_model, () => load(true));
  if (m) bars($('by_model'), m);
  const t = settled($('by_team'), snap.by_team, () => load(true));
  if (t) bars($('by_team'), t);
  loadRecs();
}

function recParams() {
  return new URLSearchParams({
    start: $('start').value, end: $('end').value,
    severity: $('severity').value, provider: $('provider').value,
    type: $('type').value, q: $('search').value,
  });
}

async function loadRecs(retry) {
  const q = recParams();
  if (retry) q.set('retry', '1');
  const res = await fetch('/api/recommendations?' + q);
  const report = await res.json();
  const el = $('recs');
  $('export').disabled = true;
  if (!res.ok) { el.innerHTML = `<p class="error">${esc(report.error)}</p>`; return; }

  const chosen = $('provider').value;
  $('provider').innerHTML = '<option value="all">All providers</option>' +
    report.providers.map(p => `<option value="${esc(p)}">${esc(p)}</option>`).join('');
  $('provider').value = report.providers.includes(chosen) ? chosen : 'all';

  settled(el, report.state, () => loadRecs(true));
  if (report.state.status !== 'ready') return;
  const s = report.summary;
  $('export').disabled = s.count === 0;
  el.innerHTML = `<div class="summary">
      <span>${s.count} shown</span>
      <span class="ok">${usd(s.total_savings_usd)} potential savings</span>
      <span class="muted">${s.by_severity.high} high · ${s.by_severity.medium} medium · ${s.by_severity.low} low</span>
    </div>` + (s.count === 0 ? '<p class="muted">No recommendations match the current filters.</p>' :
    report.recommendations.map(r => `
      <div class="rec">
        <span class="sev ${r.severity}">${r.severity}</span><strong>${esc(r.title)}</strong>
        <span class="muted">· saves ${usd(r.estimated_savings_usd)}</span>
        <p class="muted">${esc(r.description)}</p>
      </div>`).join(''));
}

async function loadHealth() {
  const el = $('health');
  try {
    const h = await (await fetch('/api/health')).json();
    el.textContent = h.status === 'healthy' ? 'API healthy' : 'API unreachable';
    el.className = 'badge ' + (h.status === 'healthy' ? 'ok' : 'error');
    el.title = h.reason || h.backend;
  } catch (e) {
    el.textContent = 'server offline';
    el.className = 'badge error';
  }
}

$('apply').onclick = () => load(false);
['severity', 'provider', 'type'].forEach(id => $(id).onchange = () => loadRecs());
$('search').oninput = () => loadRecs();
$('export').onclick = () => { window.location = '/api/recommendations.csv?' + recParams(); };

load(false);
loadHealth();
setInterval(loadHealth, 30000);
</script>
</body>
</html>
"##
);
