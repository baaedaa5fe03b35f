use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::common::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Set after a rejected login attempt
    pub error: Option<String>,
    /// Set after logging out
    pub logged_out: Option<String>,
}

/// Login form. Already-authenticated users go straight to the dashboard.
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    if state.gate.cookie_session(&jar).await.is_some() {
        return Redirect::to("/").into_response();
    }

    let banner = if query.error.is_some() {
        r#"<div class="banner error">Invalid username or password</div>"#
    } else if query.logged_out.is_some() {
        r#"<div class="banner info">You have been logged out.</div>"#
    } else {
        ""
    };

    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(LOGIN_HTML.replace("{{banner}}", banner)),
    )
        .into_response()
}

/// Dashboard page. Unauthenticated visitors are sent to the login form.
pub async fn dashboard(State(state): State<AppState>, jar: CookieJar) -> Response {
    if state.gate.cookie_session(&jar).await.is_none() {
        return Redirect::to("/login").into_response();
    }

    ([(header::CACHE_CONTROL, "no-store")], Html(DASHBOARD_HTML)).into_response()
}

const LOGIN_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Login · Datalogger Dashboard</title>
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #2563eb;
            --danger: #dc2626;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); min-height: 100vh; display: flex; align-items: center; justify-content: center; }
        .card {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 2rem;
            width: 100%;
            max-width: 360px;
        }
        h1 { font-size: 1.25rem; font-weight: 600; margin-bottom: 1.5rem; }
        label { display: block; font-size: 0.875rem; color: var(--muted); margin-bottom: 0.25rem; }
        input {
            width: 100%;
            padding: 0.5rem 0.75rem;
            border: 1px solid var(--border);
            border-radius: 0.375rem;
            font-size: 0.875rem;
            margin-bottom: 1rem;
        }
        button {
            width: 100%;
            padding: 0.5rem 1rem;
            border: 1px solid var(--accent);
            border-radius: 0.375rem;
            background: var(--accent);
            color: white;
            font-size: 0.875rem;
            cursor: pointer;
        }
        .banner { font-size: 0.875rem; padding: 0.5rem 0.75rem; border-radius: 0.375rem; margin-bottom: 1rem; }
        .banner.error { background: #fef2f2; color: var(--danger); border: 1px solid #fecaca; }
        .banner.info { background: #eff6ff; color: var(--accent); border: 1px solid #bfdbfe; }
    </style>
</head>
<body>
    <form class="card" method="post" action="/login">
        <h1>Login</h1>
        {{banner}}
        <label for="username">Username</label>
        <input id="username" name="username" autocomplete="username" required>
        <label for="password">Password</label>
        <input id="password" name="password" type="password" autocomplete="current-password" required>
        <button type="submit">Login</button>
    </form>
</body>
</html>
"##;

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Datalogger Dashboard</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.min.css">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css">
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #2563eb;
            --danger: #dc2626;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); min-height: 100vh; }

        .layout { display: flex; min-height: 100vh; }
        aside {
            width: 320px;
            flex-shrink: 0;
            background: var(--surface);
            border-right: 1px solid var(--border);
            padding: 1.5rem 1rem;
            overflow-y: auto;
        }
        main { flex: 1; padding: 1.5rem; max-width: 1100px; }

        h1 { font-size: 1.25rem; font-weight: 600; margin-bottom: 1rem; }
        h2 { font-size: 1rem; font-weight: 600; margin: 1.5rem 0 0.75rem; }
        h3 { font-size: 0.875rem; font-weight: 600; margin: 1.5rem 0 0.5rem; }

        select, .logout-btn {
            width: 100%;
            padding: 0.5rem 0.75rem;
            border: 1px solid var(--border);
            border-radius: 0.375rem;
            font-size: 0.875rem;
            background: var(--surface);
        }
        .logout-btn { cursor: pointer; margin-top: 1rem; }
        .logout-btn:hover { border-color: var(--accent); color: var(--accent); }

        .banner { font-size: 0.875rem; padding: 0.5rem 0.75rem; border-radius: 0.375rem; margin-bottom: 1rem; }
        .banner.success { background: #f0fdf4; color: #16a34a; border: 1px solid #bbf7d0; }
        .banner.error { background: #fef2f2; color: var(--danger); border: 1px solid #fecaca; }

        .metrics { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
        .metric {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
        }
        .metric .label { font-size: 0.75rem; color: var(--muted); }
        .metric .value { font-size: 1.75rem; font-weight: 600; margin-top: 0.25rem; }

        #map { height: 500px; border: 1px solid var(--border); border-radius: 0.5rem; }
        #chart {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 0.75rem 1rem;
        }

        table { width: 100%; border-collapse: collapse; font-size: 0.7rem; }
        th, td { padding: 0.25rem; border-bottom: 1px solid var(--border); text-align: right; white-space: nowrap; }
        th:first-child, td:first-child { text-align: left; }
        th { color: var(--muted); font-weight: 600; position: sticky; top: 0; background: var(--surface); }

        .placeholder {
            display: flex;
            align-items: center;
            justify-content: center;
            height: 180px;
            color: var(--muted);
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
        }
        .hidden { display: none; }
        .footer { font-size: 0.75rem; color: var(--muted); margin-top: 2rem; }
        .footer a { color: var(--muted); }
    </style>
</head>
<body>
    <div class="layout">
        <aside>
            <h1>Select Device</h1>
            <select id="device-select"></select>
            <form method="post" action="/logout">
                <button class="logout-btn" type="submit">Log out</button>
            </form>
            <div id="table-section" class="hidden">
                <h3>Device Data Table</h3>
                <a id="csv-link" href="#" style="font-size: 0.75rem;">Download CSV</a>
                <table>
                    <thead>
                        <tr><th>Timestamp</th><th>Temp</th><th>Turb</th><th>Cond</th><th>Lat</th><th>Lon</th></tr>
                    </thead>
                    <tbody id="table-body"></tbody>
                </table>
            </div>
        </aside>
        <main>
            <div id="banner"></div>
            <div id="inactive" class="placeholder">Select a device</div>
            <div id="active" class="hidden">
                <h1 id="latest-title">Latest Data</h1>
                <div class="metrics" id="metrics"></div>
                <h2>Location on Map</h2>
                <div id="map"></div>
                <h2 id="chart-title">Device Readings Over Time</h2>
                <div id="chart"></div>
            </div>
            <div class="footer"><a href="/docs">API Docs</a></div>
        </main>
    </div>

    <script src="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.iife.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js"></script>
<script>
const api = url => fetch(url).then(r => {
    if (r.status === 401) { window.location = '/login'; }
    return r.json();
});

const state = {
    device: null,
    source: null,
    map: null,
    marker: null,
    chart: null,
};

const colors = ['#dc2626', '#ca8a04', '#2563eb'];

const escapeHtml = s => String(s).replace(/[&<>"']/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c]));

function showBanner(kind, text) {
    document.getElementById('banner').innerHTML = text
        ? `<div class="banner ${kind}">${escapeHtml(text)}</div>`
        : '';
}

async function init() {
    if (new URLSearchParams(window.location.search).has('welcome')) {
        showBanner('success', 'Successfully logged in!');
        history.replaceState(null, '', '/');
    }

    const devices = await api('/api/devices');
    const select = document.getElementById('device-select');
    select.innerHTML = devices.map(d => `<option value="${d.device}">${d.device}</option>`).join('');
    select.addEventListener('change', () => selectDevice(select.value));
    if (devices.length) selectDevice(devices[0].device);
}

function selectDevice(device) {
    if (state.source) state.source.close();
    state.device = device;
    document.getElementById('csv-link').href = `/api/devices/${device}/readings.csv`;

    const source = new EventSource(`/api/devices/${device}/stream`);
    source.addEventListener('view', e => render(JSON.parse(e.data)));
    source.addEventListener('render_error', e => showBanner('error', e.data));
    source.onerror = () => {
        // Session ended or server went away: the stream is not resumed.
        if (source.readyState === EventSource.CLOSED) showBanner('error', 'Live updates stopped.');
    };
    state.source = source;
}

function render(view) {
    const device = view.status === 'active' ? view.view.device : view.device;
    if (device !== state.device) return;
    const active = view.status === 'active';
    document.getElementById('active').classList.toggle('hidden', !active);
    document.getElementById('table-section').classList.toggle('hidden', !active);
    document.getElementById('inactive').classList.toggle('hidden', active);

    if (!active) {
        document.getElementById('inactive').textContent = view.message;
        return;
    }

    const v = view.view;
    document.getElementById('latest-title').textContent = `Latest Data for ${v.device}`;
    document.getElementById('metrics').innerHTML = v.metrics.map(m => `
        <div class="metric"><div class="label">${escapeHtml(m.label)}</div><div class="value">${m.value}</div></div>
    `).join('');

    renderMap(v.map);
    renderTable(v.table);
    renderChart(v.chart);
}

function renderMap(map) {
    if (!state.map) {
        state.map = L.map('map').setView(map.center, map.zoom);
        L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
            attribution: '&copy; OpenStreetMap contributors',
        }).addTo(state.map);
    }
    // The map is created while hidden on first render.
    state.map.invalidateSize();
    state.map.setView(map.center, state.map.getZoom());

    if (state.marker) state.marker.remove();
    state.marker = L.marker(map.marker.position)
        .bindPopup(escapeHtml(map.marker.label).replace(/\n/g, '<br>'))
        .addTo(state.map);
}

function renderTable(rows) {
    document.getElementById('table-body').innerHTML = rows.map(r => `
        <tr><td>${r.timestamp}</td><td>${r.temperature}</td><td>${r.turbidity}</td><td>${r.conductivity}</td><td>${r.latitude}</td><td>${r.longitude}</td></tr>
    `).join('');
}

function renderChart(chart) {
    document.getElementById('chart-title').textContent = chart.title;
    const data = [chart.epochs, ...chart.series.map(s => s.values)];
    const container = document.getElementById('chart');

    if (state.chart && state.chart.series.length === data.length) {
        state.chart.setData(data);
        return;
    }
    if (state.chart) state.chart.destroy();

    const opts = {
        width: container.clientWidth - 32,
        height: 320,
        // Match the table: axis times in the server's display zone, not the browser's
        tzDate: ts => uPlot.tzDate(new Date(ts * 1e3), chart.timezone),
        series: [
            { label: chart.x_label },
            ...chart.series.map((s, i) => ({ label: s.name, stroke: colors[i % colors.length], width: 1.5 })),
        ],
        axes: [
            { label: chart.x_label },
            { label: chart.y_label },
        ],
    };
    state.chart = new uPlot(opts, data, container);
}

window.addEventListener('resize', () => {
    if (state.chart) {
        const container = document.getElementById('chart');
        state.chart.setSize({ width: container.clientWidth - 32, height: 320 });
    }
});

init();
</script>
</body>
</html>
"##;
