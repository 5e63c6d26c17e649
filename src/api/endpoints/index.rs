//! The upload page: one self-contained HTML document, no external assets.

use axum::response::Html;

/// `GET /`: browser front end (drag-and-drop upload, method picker,
/// strength slider, side-by-side preview, download).
pub async fn page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Image Denoiser</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 { color: #333; text-align: center; }
        .container { display: flex; flex-direction: column; gap: 20px; }
        .upload-section {
            border: 2px dashed #ccc;
            padding: 20px;
            text-align: center;
            cursor: pointer;
        }
        .upload-section:hover, .upload-section.dragging { border-color: #45a049; }
        .controls { display: flex; flex-wrap: wrap; gap: 15px; }
        .control-group { flex: 1; min-width: 200px; }
        .image-container { display: flex; flex-wrap: wrap; gap: 20px; }
        .image-box { flex: 1; min-width: 300px; text-align: center; }
        .image-box img { max-width: 100%; box-shadow: 0 2px 5px rgba(0,0,0,0.1); }
        button {
            background-color: #4CAF50;
            color: white;
            border: none;
            padding: 10px 15px;
            cursor: pointer;
            font-size: 16px;
            border-radius: 4px;
        }
        button:hover { background-color: #45a049; }
        button:disabled { background-color: #cccccc; cursor: not-allowed; }
        select, input { padding: 8px; width: 100%; margin-top: 5px; box-sizing: border-box; }
        .error-banner {
            background-color: #fdecea;
            color: #b71c1c;
            border: 1px solid #f5c6cb;
            border-radius: 4px;
            padding: 10px 15px;
            display: none;
        }
        .loader {
            border: 4px solid #f3f3f3;
            border-top: 4px solid #3498db;
            border-radius: 50%;
            width: 30px;
            height: 30px;
            animation: spin 2s linear infinite;
            margin: 20px auto;
            display: none;
        }
        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }
        .download-btn { background-color: #337ab7; margin-top: 10px; }
        .hidden { display: none; }
    </style>
</head>
<body>
    <h1>Image Denoiser</h1>
    <div class="container">
        <div class="upload-section" id="upload-area">
            <p>Drop your image here or click to upload</p>
            <input type="file" id="file-input" accept=".jpg,.jpeg,.png" style="display: none;">
        </div>

        <div class="controls">
            <div class="control-group">
                <label for="method">Denoising Method:</label>
                <select id="method">
                    <option value="gaussian">Gaussian Blur</option>
                    <option value="median">Median Blur</option>
                    <option value="bilateral">Bilateral Filter</option>
                    <option value="nlm">Non-Local Means</option>
                </select>
            </div>
            <div class="control-group">
                <label for="strength">Strength (1-15):</label>
                <input type="range" id="strength" min="1" max="15" value="5">
                <span id="strength-value">5</span>
            </div>
            <div class="control-group">
                <button id="denoise-btn" disabled>Apply Denoising</button>
            </div>
        </div>

        <div class="error-banner" id="error-banner"></div>
        <div class="loader" id="loader"></div>

        <div class="image-container">
            <div class="image-box">
                <h3>Original Image</h3>
                <img id="original-image" src="" alt="Original image will appear here" class="hidden">
            </div>
            <div class="image-box">
                <h3>Denoised Image</h3>
                <img id="denoised-image" src="" alt="Denoised image will appear here" class="hidden">
                <button id="download-btn" class="download-btn hidden">Download Denoised Image</button>
            </div>
        </div>
    </div>

    <script>
        document.addEventListener('DOMContentLoaded', function() {
            const uploadArea = document.getElementById('upload-area');
            const fileInput = document.getElementById('file-input');
            const originalImage = document.getElementById('original-image');
            const denoisedImage = document.getElementById('denoised-image');
            const denoiseBtn = document.getElementById('denoise-btn');
            const downloadBtn = document.getElementById('download-btn');
            const methodSelect = document.getElementById('method');
            const strengthSlider = document.getElementById('strength');
            const strengthValue = document.getElementById('strength-value');
            const errorBanner = document.getElementById('error-banner');
            const loader = document.getElementById('loader');

            let selectedFile = null;

            strengthSlider.addEventListener('input', function() {
                strengthValue.textContent = this.value;
            });

            uploadArea.addEventListener('click', function() {
                fileInput.click();
            });

            fileInput.addEventListener('change', function() {
                handleFileSelect(this.files);
            });

            uploadArea.addEventListener('dragover', function(e) {
                e.preventDefault();
                this.classList.add('dragging');
            });

            uploadArea.addEventListener('dragleave', function(e) {
                e.preventDefault();
                this.classList.remove('dragging');
            });

            uploadArea.addEventListener('drop', function(e) {
                e.preventDefault();
                this.classList.remove('dragging');
                handleFileSelect(e.dataTransfer.files);
            });

            denoiseBtn.addEventListener('click', function() {
                if (selectedFile) {
                    denoiseImage();
                }
            });

            downloadBtn.addEventListener('click', function() {
                if (denoisedImage.src) {
                    const link = document.createElement('a');
                    link.href = denoisedImage.src;
                    link.download = 'denoised_image.png';
                    document.body.appendChild(link);
                    link.click();
                    document.body.removeChild(link);
                }
            });

            function showError(message) {
                errorBanner.textContent = message;
                errorBanner.style.display = 'block';
            }

            function handleFileSelect(files) {
                if (files.length === 0) {
                    return;
                }
                selectedFile = files[0];
                if (!selectedFile.type.match('image.*')) {
                    showError('Please select an image file (JPEG or PNG).');
                    selectedFile = null;
                    return;
                }
                errorBanner.style.display = 'none';
                const reader = new FileReader();
                reader.onload = function(e) {
                    originalImage.src = e.target.result;
                    originalImage.classList.remove('hidden');
                    denoiseBtn.disabled = false;
                };
                reader.readAsDataURL(selectedFile);
            }

            function denoiseImage() {
                loader.style.display = 'block';
                errorBanner.style.display = 'none';
                denoisedImage.classList.add('hidden');
                downloadBtn.classList.add('hidden');

                const formData = new FormData();
                formData.append('file', selectedFile);
                formData.append('method', methodSelect.value);
                formData.append('strength', strengthSlider.value);

                fetch('/api/denoise', {
                    method: 'POST',
                    body: formData
                })
                .then(response => response.json().then(data => ({ ok: response.ok, data })))
                .then(({ ok, data }) => {
                    if (ok && data.status === 'success') {
                        denoisedImage.src = 'data:image/png;base64,' + data.denoised_image;
                        denoisedImage.classList.remove('hidden');
                        downloadBtn.classList.remove('hidden');
                    } else {
                        showError('Error: ' + (data.error || 'unexpected response'));
                    }
                })
                .catch(() => {
                    showError('An error occurred while processing the image. Please try again.');
                })
                .finally(() => {
                    loader.style.display = 'none';
                });
            }
        });
    </script>
</body>
</html>
"##;
